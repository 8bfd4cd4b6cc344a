//! TaskRunner - executes one task: submit, await finality, timestamp, classify.

use std::sync::Arc;

use tracing::{debug, warn};

use super::results::RunSlots;
use crate::domain::{
    Address, FailureStage, Payload, ResultHandle, RunId, TaskOutcome, TaskRecord,
};
use crate::ports::{Clock, SubmissionClient};

/// Everything the tasks of one run share. One instance per run, behind an `Arc`.
///
/// # Flow (per index)
/// 1. publish an in-flight record (`started_at` only)
/// 2. `submit` the payload
/// 3. `await_finality` on the pending handle
/// 4. publish the terminal record (success with a handle, or failure with a message)
///
/// Errors from steps 2 and 3 never escape `run`: they become the task's outcome.
pub struct TaskRunner {
    run_id: RunId,
    target: Address,
    payload: Payload,
    client: Arc<dyn SubmissionClient>,
    results: RunSlots,
    clock: Arc<dyn Clock>,
}

impl TaskRunner {
    pub fn new(
        run_id: RunId,
        target: Address,
        payload: Payload,
        client: Arc<dyn SubmissionClient>,
        results: RunSlots,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            run_id,
            target,
            payload,
            client,
            results,
            clock,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Run task `index` to a terminal state and return its final record.
    pub async fn run(&self, index: usize) -> TaskRecord {
        let started = TaskRecord::started(index, self.clock.now());
        self.publish(started.clone());

        let outcome = self.execute(index).await;
        let finished = started.completed(self.clock.now(), outcome);
        self.publish(finished.clone());
        finished
    }

    /// Record a failure for a task that never reported (e.g. it panicked).
    pub fn abort(&self, index: usize, reason: &str) -> TaskRecord {
        let now = self.clock.now();
        let started = self
            .results
            .get(index)
            .unwrap_or_else(|| TaskRecord::started(index, now));
        let finished = started.completed(
            now,
            TaskOutcome::failure(FailureStage::Aborted, format!("task aborted: {reason}")),
        );
        self.publish(finished.clone());
        // a record that finished before the abort stays as it was
        self.results.get(index).unwrap_or(finished)
    }

    async fn execute(&self, index: usize) -> TaskOutcome {
        let run_id = self.run_id;

        let pending = match self.client.submit(&self.target, &self.payload).await {
            Ok(pending) => pending,
            Err(err) => {
                warn!(%run_id, index, stage = %FailureStage::Submission, error = %err, "task failed");
                return TaskOutcome::failure(FailureStage::Submission, err.message());
            }
        };
        debug!(%run_id, index, id = %pending.id, "submitted");

        match self.client.await_finality(&pending).await {
            Ok(finalized) => {
                let handle = ResultHandle::resolve(&pending, finalized);
                debug!(%run_id, index, handle = %handle, "finalized");
                TaskOutcome::success(handle)
            }
            Err(err) => {
                warn!(%run_id, index, stage = %FailureStage::Finality, error = %err, "task failed");
                TaskOutcome::failure(FailureStage::Finality, err.message())
            }
        }
    }

    fn publish(&self, record: TaskRecord) {
        let index = record.index;
        if let Err(err) = self.results.publish(record) {
            warn!(run_id = %self.run_id, index, error = %err, "result not recorded");
        }
    }
}
