//! End-to-end tests of the probing pipeline.

#[cfg(test)]
mod utils;
