//! txburst-core
//!
//! Fans out N independent remote writes against one target and reports the
//! timing and outcome of each, in index order, while they complete out of order.
//!
//! # Modules
//! - **domain**: run ids, run state, task records, transaction handles, errors
//! - **ports**: SubmissionClient, Connector, Clock
//! - **app**: RunCoordinator, TaskRunner, ResultSet
//! - **impls**: StaticConnector, SerializedClient, SimulatedClient
//! - **config**: credentials and endpoint resolution

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{ResultSet, RunCoordinator, RunRequest, RunSummary};
pub use domain::{RunError, RunState, TaskRecord};
