//! Process-backed invoker: runs the producer command as a child process and
//! decodes its stdout as a timing record.

#[cfg(feature = "proc")]
mod util;

#[cfg(feature = "proc")]
pub mod proc;
#[cfg(feature = "proc")]
pub use proc::{ProcConfig, ProcInvoker};

#[cfg(feature = "proc")]
use std::sync::Arc;

#[cfg(feature = "proc")]
use hk_core::{CoreError, Progress, RunPlan, Scheduler};
#[cfg(feature = "proc")]
use hk_model::ResultSet;

/// Set in the producer's environment: index of its producer.
pub const ENV_PRODUCER_INDEX: &str = "HK_PRODUCER_INDEX";
/// Set in the producer's environment: index of the script within its producer.
pub const ENV_SCRIPT_INDEX: &str = "HK_SCRIPT_INDEX";
/// Set in the producer's environment: linear slot index of the invocation.
pub const ENV_INVOCATION_INDEX: &str = "HK_INVOCATION_INDEX";

/// Run `plan` with a default [`ProcInvoker`].
#[cfg(feature = "proc")]
pub async fn run(plan: &RunPlan, progress: Option<Progress>) -> Result<ResultSet, CoreError> {
    let invoker = Arc::new(ProcInvoker::new(ProcConfig::default()));
    Scheduler::new(invoker).run(plan, progress).await
}

pub mod prelude {
    #[cfg(feature = "proc")]
    pub use crate::{ProcConfig, ProcInvoker, run};
    pub use hk_core::{Invoker, Progress, RunPlan, Scheduler};
    pub use hk_model::{FailureKind, InvocationError, InvocationResult, ResultSet};
}
