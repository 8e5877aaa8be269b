mod command;
pub use command::CommandLine;

mod invocation;
pub use invocation::{InvocationId, InvocationResult, Outcome, Shape};

mod result_set;
pub use result_set::ResultSet;
