//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **StaticConnector**: 組み立て済みのクライアントを返すだけ
//! - **SerializedClient**: `submit` を 1 つずつに直列化
//! - **SimulatedClient / SimulatedConnector**: ランダムな遅延と失敗（ネットワークなし）

pub mod serialized;
pub mod simulated;
pub mod static_connector;

pub use self::serialized::SerializedClient;
pub use self::simulated::{SimulatedClient, SimulatedConnector, SimulationConfig};
pub use self::static_connector::StaticConnector;
