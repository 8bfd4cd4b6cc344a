//! Ports - 抽象化レイヤー
//!
//! エンジンと外部（RPC / relayer / 時刻）との境界を trait で定義します。
//!
//! - **SubmissionClient**: submit + await finality（リモートへの書き込み）
//! - **Connector**: 資格情報から SubmissionClient を組み立てる
//! - **Clock**: タイムスタンプ

pub mod clock;
pub mod connector;
pub mod submission;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::connector::Connector;
pub use self::submission::SubmissionClient;
