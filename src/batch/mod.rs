//! Multi-account batch processing

pub mod runner;

pub use runner::{BatchRunner, DEFAULT_TITLE};
