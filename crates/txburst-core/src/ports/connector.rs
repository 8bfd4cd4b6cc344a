//! Connector port - run ごとに SubmissionClient を組み立てる
//!
//! `ClientConfig` の chain_id / endpoint / 資格情報をもとに接続します。
//! 実チェーン向けのクライアントはここに差し込みます。

use std::sync::Arc;

use async_trait::async_trait;

use super::SubmissionClient;
use crate::config::ClientConfig;
use crate::domain::ConnectError;

/// Connector turns resolved credentials into a ready SubmissionClient.
///
/// Called once per run, after validation and before any task is spawned.
/// Authentication and session setup live behind this trait.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        config: &ClientConfig,
    ) -> Result<Arc<dyn SubmissionClient>, ConnectError>;
}
