//! RunCoordinator - validates a run, fans out its tasks and owns the run state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use super::results::ResultSet;
use super::task_runner::TaskRunner;
use crate::config::{ClientConfig, Credentials, DEFAULT_CHAIN_ID};
use crate::domain::{Address, Payload, RunError, RunId, RunState, TaskRecord};
use crate::ports::{Clock, Connector, SystemClock};

/// Inputs of one run, as collected by the caller.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Destination address, validated by `start_run`.
    pub target: String,

    /// Number of tasks. Must be positive.
    pub count: i64,

    pub payload: Payload,
    pub credentials: Credentials,

    /// Chain the connector builds its client for.
    pub chain_id: u64,

    /// RPC endpoint override handed to the connector.
    pub endpoint: Option<String>,
}

impl RunRequest {
    pub fn new(target: impl Into<String>, count: i64, credentials: Credentials) -> Self {
        Self {
            target: target.into(),
            count,
            payload: Payload::default(),
            credentials,
            chain_id: DEFAULT_CHAIN_ID,
            endpoint: None,
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }
}

/// Aggregate result of a finished run. Per-task detail lives in the ResultSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub count: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Orchestrates runs against one connector.
///
/// - `start_run` validates, connects, spawns `count` tasks and waits for all of them.
///   The run state stays `Running` until every task has finished, even when the
///   caller stops waiting.
/// - `snapshot`/`results` can be read from anywhere while a run is in flight.
/// - `reset` clears results, only while idle.
///
/// Shared across tasks behind an `Arc`: every method takes `&self`.
pub struct RunCoordinator {
    connector: Arc<dyn Connector>,
    clock: Arc<dyn Clock>,
    results: ResultSet,
    state_tx: Arc<watch::Sender<RunState>>,
}

impl RunCoordinator {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::with_clock(connector, Arc::new(SystemClock))
    }

    pub fn with_clock(connector: Arc<dyn Connector>, clock: Arc<dyn Clock>) -> Self {
        let (state_tx, _) = watch::channel(RunState::Idle);
        Self {
            connector,
            clock,
            results: ResultSet::new(),
            state_tx: Arc::new(state_tx),
        }
    }

    pub fn state(&self) -> RunState {
        *self.state_tx.borrow()
    }

    /// Watch run state changes (Idle <-> Running).
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state_tx.subscribe()
    }

    /// Handle to the live result set, for display.
    pub fn results(&self) -> ResultSet {
        self.results.clone()
    }

    /// Records known so far, ascending by index.
    pub fn snapshot(&self) -> Vec<TaskRecord> {
        self.results.snapshot()
    }

    /// Drop all results. Fails with `InvalidState` while a run is in flight.
    pub fn reset(&self) -> Result<(), RunError> {
        // checked and applied under the state lock, so no run can start in between
        let mut outcome = Ok(());
        self.state_tx.send_if_modified(|state| {
            if state.is_running() {
                outcome = Err(RunError::InvalidState {
                    operation: "reset",
                    state: *state,
                });
            } else {
                self.results.clear();
            }
            false
        });
        outcome
    }

    /// Validate `request`, dispatch its tasks and wait until every one is terminal.
    ///
    /// Pre-dispatch failures (`InvalidState`, `InvalidTarget`, `InvalidCount`,
    /// `MissingCredential`, `Connect`) leave the result set untouched and the
    /// state `Idle` (or `Running` for the run that already holds it). Per-task
    /// failures never surface here: they end up in the result set.
    ///
    /// Once connected, the tasks are joined by a detached driver task that
    /// owns the `Running` state. Dropping this future stops the waiting, not
    /// the run: the state goes back to `Idle` only when the last task is done.
    pub async fn start_run(&self, request: RunRequest) -> Result<RunSummary, RunError> {
        self.ensure_idle("start a run")?;
        let target = Address::parse(&request.target)?;
        let count = validate_count(request.count)?;
        let credentials = request.credentials.require()?;

        let running = RunningGuard::acquire(Arc::clone(&self.state_tx))?;

        let started_at = self.clock.now();
        let run_id = RunId::at(started_at);
        info!(%run_id, %target, count, chain_id = request.chain_id, "starting run");

        let config = ClientConfig {
            credentials,
            chain_id: request.chain_id,
            endpoint: request.endpoint,
        };
        let client = self.connector.connect(&config).await.map_err(|err| {
            warn!(%run_id, error = %err, "connect failed");
            RunError::from(err)
        })?;

        let runner = Arc::new(TaskRunner::new(
            run_id,
            target,
            request.payload,
            client,
            self.results.prepare(count),
            Arc::clone(&self.clock),
        ));
        let clock = Arc::clone(&self.clock);

        tokio::spawn(async move {
            let _running = running;
            join_run(runner, count, clock.as_ref(), started_at).await
        })
        .await
        .map_err(|err| RunError::Aborted {
            run_id,
            reason: err.to_string(),
        })
    }

    fn ensure_idle(&self, operation: &'static str) -> Result<(), RunError> {
        let state = self.state();
        if state.is_running() {
            return Err(RunError::InvalidState { operation, state });
        }
        Ok(())
    }
}

/// Spawn the `count` tasks of a run and join them in index order.
async fn join_run(
    runner: Arc<TaskRunner>,
    count: usize,
    clock: &dyn Clock,
    started_at: DateTime<Utc>,
) -> RunSummary {
    let run_id = runner.run_id();

    let mut joins = Vec::with_capacity(count);
    for index in 0..count {
        let runner = Arc::clone(&runner);
        joins.push(tokio::spawn(async move { runner.run(index).await }));
    }

    let mut succeeded = 0;
    for (index, join) in joins.into_iter().enumerate() {
        let record = match join.await {
            Ok(record) => record,
            Err(err) => {
                warn!(%run_id, index, error = %err, "task did not finish");
                runner.abort(index, &err.to_string())
            }
        };
        if record.outcome().is_some_and(|o| o.is_success()) {
            succeeded += 1;
        }
    }

    let summary = RunSummary {
        run_id,
        count,
        succeeded,
        failed: count - succeeded,
        started_at,
        ended_at: clock.now().max(started_at),
    };
    info!(
        %run_id,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "run finished"
    );
    summary
}

fn validate_count(count: i64) -> Result<usize, RunError> {
    if count <= 0 {
        return Err(RunError::InvalidCount(count));
    }
    usize::try_from(count).map_err(|_| RunError::InvalidCount(count))
}

/// Holds the run state at `Running` and puts it back to `Idle` on drop,
/// whether the run finished, failed to connect or its driver went away.
struct RunningGuard {
    state_tx: Arc<watch::Sender<RunState>>,
}

impl RunningGuard {
    fn acquire(state_tx: Arc<watch::Sender<RunState>>) -> Result<Self, RunError> {
        let mut acquired = false;
        state_tx.send_if_modified(|state| {
            if state.is_running() {
                return false;
            }
            *state = RunState::Running;
            acquired = true;
            true
        });
        if !acquired {
            return Err(RunError::InvalidState {
                operation: "start a run",
                state: RunState::Running,
            });
        }
        Ok(Self { state_tx })
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.state_tx.send_replace(RunState::Idle);
    }
}
