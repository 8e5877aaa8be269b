use std::process::ExitStatus;

use hk_model::{InvocationError, InvocationResult};
use tokio::process::Command;

pub fn cmd_program(program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|s| s.as_str()));
    cmd
}

/// Map an unsuccessful exit status to its failure cause.
pub fn exit_failure(status: ExitStatus) -> Option<InvocationError> {
    if status.success() {
        return None;
    }
    Some(match status.code() {
        Some(code) => InvocationError::NonZeroExit { code },
        None => InvocationError::KilledBySignal,
    })
}

/// Decode captured stdout as `{"startDate": <number>, "endDate": <number>}`.
pub fn decode_record(stdout: &[u8]) -> Result<InvocationResult, InvocationError> {
    serde_json::from_slice(stdout).map_err(|e| InvocationError::Decode(e.to_string()))
}
