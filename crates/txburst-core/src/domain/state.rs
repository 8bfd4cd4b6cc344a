//! Run state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall state of the coordinator. Only one run at a time.
///
/// State transitions:
/// - Idle -> Running (dispatch start, after validation)
/// - Running -> Idle (every task terminal, or connect failure)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// No run in flight. A new run may start; results may be reset.
    #[default]
    Idle,

    /// Tasks are in flight.
    Running,
}

impl RunState {
    pub fn is_running(self) -> bool {
        matches!(self, RunState::Running)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Running => f.write_str("running"),
        }
    }
}
