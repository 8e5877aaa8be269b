use hk_model::{CommandLine, Shape};
use tokio::sync::Semaphore;

use crate::error::CoreError;

/// What to run and how wide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunPlan {
    /// Producer command, split on whitespace.
    pub command: String,
    pub producers: usize,
    /// Invocations per producer.
    pub scripts: usize,
    /// Concurrency cap; must be at least 1.
    pub workers: usize,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            command: String::new(),
            producers: 100,
            scripts: 20,
            workers: 50,
        }
    }
}

impl RunPlan {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers;
        self
    }

    pub fn with_scripts(mut self, scripts: usize) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::new(self.producers, self.scripts)
    }

    /// Check the preconditions that make scheduling possible and parse the command.
    pub fn validate(&self) -> Result<CommandLine, CoreError> {
        if self.workers == 0 {
            return Err(CoreError::InvalidPlan("workers must be at least 1".into()));
        }
        if self.workers > Semaphore::MAX_PERMITS {
            return Err(CoreError::InvalidPlan(format!(
                "workers must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        self.shape().total()?;
        Ok(CommandLine::parse(&self.command)?)
    }
}
