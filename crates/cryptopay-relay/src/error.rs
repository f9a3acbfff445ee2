use thiserror::Error;

/// Errors returned by relay operations.
///
/// Only the forwarder surfaces these to its caller; the invoice resolver and
/// the notifier contain their own failures.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
