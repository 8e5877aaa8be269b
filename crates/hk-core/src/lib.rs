pub mod error;
pub use error::CoreError;
pub mod invoker;
pub use invoker::{Invocation, Invoker};
pub mod plan;
pub use plan::RunPlan;
pub mod progress;
pub use progress::Progress;
pub mod scheduler;
pub use scheduler::Scheduler;
pub mod slots;
pub use slots::SlotBuffer;
