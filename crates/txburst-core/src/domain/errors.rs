//! Errors and their classification.
//!
//! Two levels:
//! - `RunError`: batch level. Returned to the caller of `start_run`/`reset`,
//!   always before any task is spawned (or after the run is fully joined).
//! - `SubmissionError` / `FinalityError`: task level. Produced by a
//!   `SubmissionClient` and converted into a failure outcome by the task
//!   runner. They never reach the coordinator's caller.

use thiserror::Error;

use super::ids::RunId;
use super::state::RunState;
use crate::config::CredentialKind;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid target address: {0:?}")]
    InvalidTarget(String),

    #[error("transaction count must be a positive number, got {0}")]
    InvalidCount(i64),

    #[error("missing {0}")]
    MissingCredential(CredentialKind),

    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: RunState,
    },

    #[error("failed to connect submission client: {0}")]
    Connect(#[from] ConnectError),

    #[error("task index {index} out of range for a run of {capacity} tasks")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("run {run_id} stopped before its tasks were joined: {reason}")]
    Aborted { run_id: RunId, reason: String },
}

/// Building a submission client failed (bad endpoint, rejected session, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConnectError(pub String);

/// The client rejected or failed to send a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A submitted payload never reached finality (reverted, dropped, timed out, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FinalityError {
    message: String,
}

impl FinalityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
