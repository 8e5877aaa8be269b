use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use hk_model::{InvocationError, Outcome, ResultSet};
use tokio::{
    sync::{OwnedSemaphorePermit, Semaphore},
    task::JoinSet,
    time::Instant,
};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::CoreError,
    invoker::{Invocation, Invoker},
    plan::RunPlan,
    progress::Progress,
    slots::SlotBuffer,
};

/// Fans a [`RunPlan`] out over an [`Invoker`] with at most `workers`
/// invocations in flight.
pub struct Scheduler {
    invoker: Arc<dyn Invoker>,
}

impl Scheduler {
    pub fn new(invoker: Arc<dyn Invoker>) -> Self {
        Self { invoker }
    }

    /// Run every `(producer, script)` invocation and return the full result set.
    ///
    /// Only plan preconditions are errors; invocation failures are recorded in
    /// their slot and never stop the batch. `progress` fires once per finished
    /// invocation, successful or not.
    #[instrument(
        level = "debug",
        skip_all,
        fields(invoker = self.invoker.name(), producers = plan.producers, scripts = plan.scripts, workers = plan.workers)
    )]
    pub async fn run(
        &self,
        plan: &RunPlan,
        progress: Option<Progress>,
    ) -> Result<ResultSet, CoreError> {
        let command = Arc::new(plan.validate()?);
        let shape = plan.shape();
        let total = shape.total()?;

        let slots = Arc::new(SlotBuffer::new(total));
        let gate = Arc::new(Semaphore::new(plan.workers));
        let completed = Arc::new(AtomicUsize::new(0));
        let started = Instant::now();

        info!(target: "hk.core.scheduler", %command, total, workers = plan.workers, "run started");

        let mut tasks = JoinSet::new();
        for id in shape.ids() {
            // Blocks the launch loop once every worker is busy.
            let permit = Arc::clone(&gate)
                .acquire_owned()
                .await
                .map_err(|_| CoreError::GateClosed)?;

            let guard = Completion {
                progress: progress.clone(),
                completed: Arc::clone(&completed),
                _permit: permit,
            };
            let invoker = Arc::clone(&self.invoker);
            let slots = Arc::clone(&slots);
            let invocation = Invocation {
                id,
                command: Arc::clone(&command),
            };

            tasks.spawn(async move {
                let _guard = guard;
                let outcome = invoker.invoke(&invocation).await;
                if let Err(e) = &outcome {
                    debug!(target: "hk.core.scheduler", id = %invocation.id, kind = e.kind().as_str(), error = %e, "invocation failed");
                }
                if let Err(e) = slots.fill(invocation.id.index, outcome) {
                    error!(target: "hk.core.scheduler", id = %invocation.id, error = %e, "slot write rejected");
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(target: "hk.core.scheduler", error = %e, "invocation task aborted");
            }
        }

        let unfilled = slots.len() - slots.filled();
        if unfilled > 0 {
            warn!(target: "hk.core.scheduler", unfilled, "invocations ended without an outcome");
        }
        let aborted = |index: usize| -> Outcome {
            debug!(target: "hk.core.scheduler", index, "slot left empty by its task");
            Err(InvocationError::Aborted("invocation task did not complete".into()))
        };
        let outcomes = match Arc::try_unwrap(slots) {
            Ok(slots) => slots.into_outcomes(aborted),
            Err(shared) => shared.snapshot(aborted),
        };
        let results = ResultSet::from_outcomes(shape, outcomes)?;

        info!(
            target: "hk.core.scheduler",
            total,
            completed = completed.load(Ordering::Relaxed),
            failed = results.failure_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run finished"
        );
        Ok(results)
    }
}

/// Bound to a task's lifetime: on exit (normal or panic) it counts the
/// completion, fires progress, then returns the permit.
struct Completion {
    progress: Option<Progress>,
    completed: Arc<AtomicUsize>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        if let Some(progress) = &self.progress {
            progress.notify();
        }
    }
}
