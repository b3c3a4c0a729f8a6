//! Wire-level probe implementations.

pub mod http;

pub use http::{HttpProber, ProbeError};
