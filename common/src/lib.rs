//! Shared models and configuration used by every `probr` crate.

pub mod config;
pub mod error;
pub mod network;
pub mod probe;
