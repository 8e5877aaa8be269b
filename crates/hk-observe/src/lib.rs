//! Diagnostics for the `hk` binary.
//!
//! Logs go to stderr through a [`Console`], which shares the terminal with the
//! progress bar. The report itself is written to stdout by the caller.
mod logger;
pub use logger::*;
