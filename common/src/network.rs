pub mod spec;
pub mod target;
