//! Data model shared by the scheduler, the process invoker and the report.
//!
//! Nothing in this crate performs I/O; it only describes what a producer
//! invocation is, what it reports back and how outcomes are laid out.

mod domain;
pub use domain::*;

mod error;
pub use error::{FailureKind, InvocationError, ModelError};
