use std::sync::Arc;

use async_trait::async_trait;
use hk_model::{CommandLine, InvocationId, Outcome};

/// One unit of work handed to an [`Invoker`].
#[derive(Clone, Debug)]
pub struct Invocation {
    pub id: InvocationId,
    pub command: Arc<CommandLine>,
}

/// Executes a single producer invocation.
///
/// Implementations must not panic on producer failures: every failure is
/// returned as an `Err` outcome and lands in the invocation's slot.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn invoke(&self, invocation: &Invocation) -> Outcome;
}
