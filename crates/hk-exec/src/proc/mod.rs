use std::{path::PathBuf, process::Stdio};

use async_trait::async_trait;
use hk_core::{Invocation, Invoker};
use hk_model::{InvocationError, Outcome};
use tracing::{debug, trace};

use crate::{
    ENV_INVOCATION_INDEX, ENV_PRODUCER_INDEX, ENV_SCRIPT_INDEX,
    util::{cmd_program, decode_record, exit_failure},
};

/// Settings applied to every spawned producer.
#[derive(Clone, Debug, Default)]
pub struct ProcConfig {
    /// Extra environment variables.
    pub env: Vec<(String, String)>,
    /// Working directory; inherited from the harness when `None`.
    pub cwd: Option<PathBuf>,
}

impl ProcConfig {
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Invoker that spawns the producer command once per invocation.
///
/// Stdout is captured in full and decoded after the process exits. Stderr is
/// discarded and stdin is closed. There is no timeout.
pub struct ProcInvoker {
    cfg: ProcConfig,
}

impl ProcInvoker {
    pub fn new(cfg: ProcConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Invoker for ProcInvoker {
    fn name(&self) -> &'static str {
        "proc"
    }

    async fn invoke(&self, invocation: &Invocation) -> Outcome {
        let id = invocation.id;
        let command = &invocation.command;

        let mut cmd = cmd_program(command.program(), command.args());
        if let Some(cwd) = &self.cfg.cwd {
            cmd.current_dir(cwd);
        }
        for (k, v) in &self.cfg.env {
            cmd.env(k, v);
        }
        cmd.env(ENV_PRODUCER_INDEX, id.producer.to_string())
            .env(ENV_SCRIPT_INDEX, id.script.to_string())
            .env(ENV_INVOCATION_INDEX, id.index.to_string());

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::null());

        trace!(target: "hk.exec.proc", %id, program = command.program(), args = ?command.args(), "spawn");
        let child = cmd
            .spawn()
            .map_err(|e| InvocationError::Spawn(e.to_string()))?;

        let output = child.wait_with_output().await?;
        if let Some(failure) = exit_failure(output.status) {
            debug!(target: "hk.exec.proc", %id, status = %output.status, "producer failed");
            return Err(failure);
        }

        let record = decode_record(&output.stdout)?;
        trace!(target: "hk.exec.proc", %id, duration = record.duration(), "exit success");
        Ok(record)
    }
}
