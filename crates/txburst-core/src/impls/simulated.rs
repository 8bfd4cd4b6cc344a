//! SimulatedClient - an in-process stand-in for a relayer/RPC endpoint.
//!
//! Useful for demos and load-shape experiments: random latency per stage and
//! configurable failure rates, no network.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::config::ClientConfig;
use crate::domain::{
    Address, ConnectError, FinalHandle, FinalityError, Payload, PendingHandle, SubmissionError,
};
use crate::ports::{Connector, SubmissionClient};

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Latency of `submit`, in milliseconds.
    pub submit_latency_ms: Range<u64>,

    /// Latency of `await_finality`, in milliseconds.
    pub finality_latency_ms: Range<u64>,

    /// Probability (0.0..=1.0) that `submit` fails.
    pub submit_failure_rate: f64,

    /// Probability (0.0..=1.0) that `await_finality` fails.
    pub finality_failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            submit_latency_ms: 50..250,
            finality_latency_ms: 500..2500,
            submit_failure_rate: 0.0,
            finality_failure_rate: 0.0,
        }
    }
}

pub struct SimulatedClient {
    config: SimulationConfig,
}

impl SimulatedClient {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    // ThreadRng is not Send, so every draw happens before the first await.
    fn draw(&self, latency: &Range<u64>, failure_rate: f64) -> (Duration, bool) {
        let mut rng = rand::thread_rng();
        let ms = if latency.is_empty() {
            latency.start
        } else {
            rng.gen_range(latency.clone())
        };
        let fails = rng.gen_bool(failure_rate.clamp(0.0, 1.0));
        (Duration::from_millis(ms), fails)
    }
}

#[async_trait]
impl SubmissionClient for SimulatedClient {
    async fn submit(
        &self,
        _destination: &Address,
        _payload: &Payload,
    ) -> Result<PendingHandle, SubmissionError> {
        let (delay, fails) = self.draw(
            &self.config.submit_latency_ms,
            self.config.submit_failure_rate,
        );
        let hash = random_hash();
        tokio::time::sleep(delay).await;
        if fails {
            return Err(SubmissionError::new("relayer rejected transaction"));
        }
        Ok(PendingHandle::new(hash))
    }

    async fn await_finality(&self, pending: &PendingHandle) -> Result<FinalHandle, FinalityError> {
        let (delay, fails) = self.draw(
            &self.config.finality_latency_ms,
            self.config.finality_failure_rate,
        );
        let block_number = rand::thread_rng().gen_range(1_000_000..2_000_000);
        tokio::time::sleep(delay).await;
        if fails {
            return Err(FinalityError::new(format!(
                "transaction {} was not mined",
                pending.id
            )));
        }
        Ok(FinalHandle {
            id: Some(pending.id.clone()),
            block_number: Some(block_number),
        })
    }
}

/// Builds a SimulatedClient per run. Rejects endpoints that are not URLs.
pub struct SimulatedConnector {
    config: SimulationConfig,
}

impl SimulatedConnector {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for SimulatedConnector {
    async fn connect(
        &self,
        config: &ClientConfig,
    ) -> Result<Arc<dyn SubmissionClient>, ConnectError> {
        if let Some(endpoint) = &config.endpoint {
            let supported = ["http://", "https://", "ws://", "wss://"];
            if !supported.iter().any(|scheme| endpoint.starts_with(scheme)) {
                return Err(ConnectError(format!("unsupported endpoint: {endpoint}")));
            }
        }
        Ok(Arc::new(SimulatedClient::new(self.config.clone())))
    }
}

/// `0x` + 64 hex digits.
fn random_hash() -> String {
    let bytes: [u8; 32] = rand::random();
    format!("0x{}", hex::encode(bytes))
}
