//! StaticConnector - 組み立て済みのクライアントを 1 つ返す

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::domain::ConnectError;
use crate::ports::{Connector, SubmissionClient};

/// Connector for callers that build the client themselves.
///
/// Credentials are still validated by the coordinator before `connect` is
/// called, but are otherwise ignored here.
pub struct StaticConnector {
    client: Arc<dyn SubmissionClient>,
}

impl StaticConnector {
    pub fn new(client: Arc<dyn SubmissionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Connector for StaticConnector {
    async fn connect(
        &self,
        _config: &ClientConfig,
    ) -> Result<Arc<dyn SubmissionClient>, ConnectError> {
        Ok(Arc::clone(&self.client))
    }
}
