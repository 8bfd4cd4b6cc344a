//! SubmissionClient port - the remote write capability shared by all tasks.

use async_trait::async_trait;

use crate::domain::{Address, FinalHandle, FinalityError, Payload, PendingHandle, SubmissionError};

/// SubmissionClient sends one payload and waits for it to become final.
///
/// # Concurrency contract
/// One client instance is shared by every task of a run and is called
/// concurrently (`Send + Sync`, `&self`). Implementations must be internally
/// synchronized. A client that cannot take concurrent submissions (e.g. one
/// that assigns sequence numbers locally) should be wrapped in
/// `impls::SerializedClient`.
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Send `payload` to `destination`. Returns once the remote side accepted it.
    async fn submit(
        &self,
        destination: &Address,
        payload: &Payload,
    ) -> Result<PendingHandle, SubmissionError>;

    /// Wait until a submitted payload is final.
    async fn await_finality(&self, pending: &PendingHandle) -> Result<FinalHandle, FinalityError>;
}
