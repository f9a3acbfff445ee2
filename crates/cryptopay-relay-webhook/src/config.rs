use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WEBHOOK_PATH: &str = "/cryptobot-webhook";
const DEFAULT_RATE_LIMIT_RPM: u64 = 120;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_BYTES: usize = 65_536;

/// Server settings, read once at startup.
///
/// The per-invocation relay settings (secrets, forward URL) are not here;
/// they are re-read on every request through
/// [`ConfigSource`](cryptopay::ConfigSource).
#[derive(Clone)]
pub struct ServerConfig {
    /// Listen port
    pub port: u16,
    /// Path the webhook is mounted on
    pub webhook_path: String,
    /// Rate limit for /health and /metrics, requests per minute per client IP.
    /// The webhook route is not limited.
    pub rate_limit_rpm: u64,
    /// Bearer token required for /metrics (None = see `public_metrics`)
    pub metrics_token: Option<String>,
    /// Serve /metrics without a token when no token is set
    pub public_metrics: bool,
    /// Timeout applied to every outbound request
    pub http_timeout_secs: u64,
    /// Maximum accepted webhook body size
    pub max_body_bytes: usize,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("webhook_path", &self.webhook_path)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("public_metrics", &self.public_metrics)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|s| !s.is_empty());

        let port = get("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let webhook_path = get("WEBHOOK_PATH").unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.to_string());
        if !webhook_path.starts_with('/') || webhook_path.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidPath(webhook_path));
        }
        if matches!(webhook_path.as_str(), "/health" | "/metrics") {
            return Err(ConfigError::InvalidPath(webhook_path));
        }

        let rate_limit_rpm = get("RATE_LIMIT_RPM")
            .and_then(|s| s.parse().ok())
            .filter(|&r: &u64| r > 0)
            .unwrap_or(DEFAULT_RATE_LIMIT_RPM);

        let metrics_token = get("METRICS_TOKEN");

        let public_metrics = get("PUBLIC_METRICS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let http_timeout_secs = get("HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .filter(|&t: &u64| t > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        let max_body_bytes = get("MAX_BODY_BYTES")
            .and_then(|s| s.parse().ok())
            .filter(|&b: &usize| b > 0)
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        if metrics_token.is_none() && !public_metrics {
            tracing::warn!("METRICS_TOKEN not set — /metrics will answer 403");
        }

        Ok(Self {
            port,
            webhook_path,
            rate_limit_rpm,
            metrics_token,
            public_metrics,
            http_timeout_secs,
            max_body_bytes,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid webhook path: {0}")]
    InvalidPath(String),

    #[error("invalid forward URL: {0}")]
    InvalidForwardUrl(#[from] cryptopay::RelayError),
}
