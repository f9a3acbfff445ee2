use std::sync::Arc;
use std::time::Duration;

use cryptopay::{ConfigSource, EnvConfig};

use crate::config::ServerConfig;

/// Shared application state. Holds nothing mutable: the relay configuration
/// is loaded from `config_source` on every invocation.
#[derive(Clone)]
pub struct AppState {
    pub config_source: Arc<dyn ConfigSource>,
    pub http_client: reqwest::Client,
    /// Bearer token for /metrics.
    pub metrics_token: Option<Vec<u8>>,
    pub public_metrics: bool,
    /// Largest webhook body that is read into memory.
    pub max_body_bytes: usize,
}

impl AppState {
    /// State for the real server: relay settings come from the environment.
    pub fn new(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            config_source: Arc::new(EnvConfig),
            http_client: http_client(Duration::from_secs(config.http_timeout_secs))?,
            metrics_token: config.metrics_token.as_ref().map(|t| t.as_bytes().to_vec()),
            public_metrics: config.public_metrics,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

/// Client used for every outbound call.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none()) // backend redirects must not re-target the relay token
        .build()
}
