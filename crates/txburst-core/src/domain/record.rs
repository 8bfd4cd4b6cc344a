//! Per-task record: timing and outcome of one dispatched task.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::transaction::ResultHandle;

/// Which step of a task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// `submit` returned an error.
    Submission,

    /// `await_finality` returned an error.
    Finality,

    /// The task itself panicked or was torn down before reporting.
    Aborted,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Submission => f.write_str("submission"),
            FailureStage::Finality => f.write_str("finality"),
            FailureStage::Aborted => f.write_str("aborted"),
        }
    }
}

/// Terminal result of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskOutcome {
    Success { handle: ResultHandle },
    Failure { stage: FailureStage, message: String },
}

impl TaskOutcome {
    pub fn success(handle: ResultHandle) -> Self {
        TaskOutcome::Success { handle }
    }

    pub fn failure(stage: FailureStage, message: impl Into<String>) -> Self {
        TaskOutcome::Failure {
            stage,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success { .. })
    }
}

/// End time and outcome, always set together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub ended_at: DateTime<Utc>,
    pub outcome: TaskOutcome,
}

/// One row of the report.
///
/// Design:
/// - `started_at` is set once when the record is created.
/// - `completion` bundles `ended_at` with the outcome, so a reader can never
///   see one without the other.
/// - Once `completion` is set the record no longer changes (see `merge`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub index: usize,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<Completion>,
}

impl TaskRecord {
    /// A record for a task that has just started and is still in flight.
    pub fn started(index: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            index,
            started_at,
            completion: None,
        }
    }

    /// The terminal version of this record.
    ///
    /// `ended_at` is clamped to `started_at` so durations are never negative.
    pub fn completed(&self, ended_at: DateTime<Utc>, outcome: TaskOutcome) -> Self {
        Self {
            index: self.index,
            started_at: self.started_at,
            completion: Some(Completion {
                ended_at: ended_at.max(self.started_at),
                outcome,
            }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.completion.is_some()
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.completion.as_ref().map(|c| c.ended_at)
    }

    pub fn duration(&self) -> Option<TimeDelta> {
        self.ended_at().map(|ended_at| ended_at - self.started_at)
    }

    pub fn outcome(&self) -> Option<&TaskOutcome> {
        self.completion.as_ref().map(|c| &c.outcome)
    }

    pub fn result_handle(&self) -> Option<&ResultHandle> {
        match self.outcome()? {
            TaskOutcome::Success { handle } => Some(handle),
            TaskOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self.outcome()? {
            TaskOutcome::Success { .. } => None,
            TaskOutcome::Failure { message, .. } => Some(message),
        }
    }

    pub fn failure_stage(&self) -> Option<FailureStage> {
        match self.outcome()? {
            TaskOutcome::Success { .. } => None,
            TaskOutcome::Failure { stage, .. } => Some(*stage),
        }
    }

    /// Merge a later write for the same index into this record.
    ///
    /// `started_at` is never overwritten. A terminal record is frozen: the
    /// update is dropped and `false` is returned.
    pub fn merge(&mut self, update: TaskRecord) -> bool {
        debug_assert_eq!(self.index, update.index);
        if self.is_terminal() {
            return false;
        }
        if let Some(mut completion) = update.completion {
            completion.ended_at = completion.ended_at.max(self.started_at);
            self.completion = Some(completion);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, secs).unwrap()
    }

    #[test]
    fn started_record_has_no_terminal_fields() {
        let r = TaskRecord::started(3, at(0));
        assert!(!r.is_terminal());
        assert_eq!(r.ended_at(), None);
        assert_eq!(r.duration(), None);
        assert_eq!(r.result_handle(), None);
        assert_eq!(r.failure_message(), None);
    }

    #[test]
    fn completed_success_sets_handle_only() {
        let r = TaskRecord::started(0, at(0))
            .completed(at(2), TaskOutcome::success(ResultHandle::new("h0")));
        assert_eq!(r.duration(), Some(TimeDelta::seconds(2)));
        assert_eq!(r.result_handle().map(ResultHandle::as_str), Some("h0"));
        assert_eq!(r.failure_message(), None);
        assert_eq!(r.failure_stage(), None);
    }

    #[test]
    fn completed_failure_sets_message_only() {
        let r = TaskRecord::started(1, at(0))
            .completed(at(1), TaskOutcome::failure(FailureStage::Finality, "timeout"));
        assert_eq!(r.result_handle(), None);
        assert_eq!(r.failure_message(), Some("timeout"));
        assert_eq!(r.failure_stage(), Some(FailureStage::Finality));
    }

    #[test]
    fn ended_at_is_clamped_to_started_at() {
        let r = TaskRecord::started(0, at(5))
            .completed(at(1), TaskOutcome::success(ResultHandle::new("h")));
        assert_eq!(r.ended_at(), Some(at(5)));
        assert_eq!(r.duration(), Some(TimeDelta::zero()));
    }

    #[test]
    fn merge_keeps_started_at() {
        let mut stored = TaskRecord::started(0, at(0));
        let update = TaskRecord::started(0, at(9))
            .completed(at(10), TaskOutcome::success(ResultHandle::new("h")));

        assert!(stored.merge(update));
        assert_eq!(stored.started_at, at(0));
        assert_eq!(stored.ended_at(), Some(at(10)));
        assert_eq!(stored.duration(), Some(TimeDelta::seconds(10)));
    }

    #[test]
    fn terminal_record_is_frozen() {
        let mut stored = TaskRecord::started(0, at(0))
            .completed(at(1), TaskOutcome::success(ResultHandle::new("first")));
        let update = TaskRecord::started(0, at(0))
            .completed(at(2), TaskOutcome::failure(FailureStage::Submission, "late"));

        assert!(!stored.merge(update));
        assert_eq!(stored.result_handle().map(ResultHandle::as_str), Some("first"));
        assert_eq!(stored.ended_at(), Some(at(1)));
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let o = TaskOutcome::failure(FailureStage::Submission, "boom");
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["kind"], "FAILURE");
        assert_eq!(v["stage"], "submission");
        assert_eq!(v["message"], "boom");
    }
}
