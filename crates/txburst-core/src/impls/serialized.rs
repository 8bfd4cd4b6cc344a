//! SerializedClient - one submission at a time over a client that needs it.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Address, FinalHandle, FinalityError, Payload, PendingHandle, SubmissionError};
use crate::ports::SubmissionClient;

/// Wraps a client whose `submit` must not run concurrently (for example one
/// that assigns nonces locally).
///
/// Only `submit` is serialized. `await_finality` calls still run in parallel,
/// so tasks overlap while they wait for finality but are sent one by one.
pub struct SerializedClient<C> {
    inner: C,
    submit_lock: Mutex<()>,
}

impl<C: SubmissionClient> SerializedClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            submit_lock: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: SubmissionClient> SubmissionClient for SerializedClient<C> {
    async fn submit(
        &self,
        destination: &Address,
        payload: &Payload,
    ) -> Result<PendingHandle, SubmissionError> {
        let _guard = self.submit_lock.lock().await;
        self.inner.submit(destination, payload).await
    }

    async fn await_finality(&self, pending: &PendingHandle) -> Result<FinalHandle, FinalityError> {
        self.inner.await_finality(pending).await
    }
}
