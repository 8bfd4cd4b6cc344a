//! App - 並列送信エンジン
//!
//! - **RunCoordinator**: 入力検証、run の状態管理、fan-out と join
//! - **TaskRunner**: 1 タスク分の submit -> finality -> record
//! - **ResultSet**: index ごとの記録。snapshot は index 昇順

pub mod coordinator;
pub mod results;
pub mod task_runner;

pub use self::coordinator::{RunCoordinator, RunRequest, RunSummary};
pub use self::results::{ResultSet, RunSlots};
pub use self::task_runner::TaskRunner;
