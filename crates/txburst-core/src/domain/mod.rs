//! Domain model (ids, run state, task records, transaction handles, errors).

pub mod errors;
pub mod ids;
pub mod record;
pub mod state;
pub mod transaction;

pub use self::errors::{ConnectError, FinalityError, RunError, SubmissionError};
pub use self::ids::RunId;
pub use self::record::{Completion, FailureStage, TaskOutcome, TaskRecord};
pub use self::state::RunState;
pub use self::transaction::{Address, FinalHandle, Payload, PendingHandle, ResultHandle};
