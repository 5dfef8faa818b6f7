//! Command-line entry logic shared by the binary

pub mod run;

pub use run::{RunArgs, run_checkin_mode};
