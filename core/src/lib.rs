//! # probr core
//!
//! The concurrent probing pipeline: probe expansion, HTTPS-first fallback,
//! the fast and patient worker tiers and the fan-in of their results.

pub mod aggregate;
pub mod expand;
pub mod fallback;
pub mod pipeline;
pub mod pool;
pub mod stage;

pub use aggregate::{LineSink, MemorySink, OutputSink, StdoutSink};
pub use pipeline::{Pipeline, RunSummary};
