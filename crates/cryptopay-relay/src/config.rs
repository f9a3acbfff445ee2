//! Per-invocation relay configuration.
//!
//! Everything here is read from the process environment at the start of each
//! webhook invocation. Nothing is cached, so rotating a secret takes effect on
//! the next request without a restart.

use std::env;
use std::fmt;

use url::Url;

use crate::constants::{CRYPTOBOT_API_URL, TELEGRAM_API_URL};
use crate::error::RelayError;

/// What an unconfigured webhook secret means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignaturePolicy {
    /// No secret configured: accept every body. Deployment risk, but it is
    /// the behavior existing installations rely on.
    #[default]
    TrustWhenUnconfigured,
    /// No secret configured: refuse to process webhooks.
    Require,
}

#[derive(Clone, Default)]
pub struct RelayConfig {
    /// HMAC secret shared with the provider (`WEBHOOK_SECRET`).
    pub webhook_secret: Option<String>,
    /// Provider API token (`CRYPTOBOT_TOKEN`). Required for confirmation.
    pub api_token: Option<String>,
    /// Telegram bot token for admin notifications (`BOT_TOKEN`).
    pub bot_token: Option<String>,
    /// Telegram chat id to notify (`ADMIN_ID`).
    pub admin_chat_id: Option<String>,
    /// Downstream backend URL (`FORWARD_URL`). Forwarding is skipped when unset.
    pub forward_url: Option<String>,
    /// Relay authentication token for the backend (`RELAY_TOKEN`).
    pub relay_token: Option<String>,
    /// Provider API base (`CRYPTOBOT_API_URL`).
    pub api_url: String,
    /// Telegram API base (`TELEGRAM_API_URL`).
    pub telegram_api_url: String,
    /// `WEBHOOK_REQUIRE_SIGNATURE`
    pub signature_policy: SignaturePolicy,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("RelayConfig")
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("api_token", &redact(&self.api_token))
            .field("bot_token", &redact(&self.bot_token))
            .field("admin_chat_id", &self.admin_chat_id)
            .field("forward_url", &self.forward_url)
            .field("relay_token", &redact(&self.relay_token))
            .field("api_url", &self.api_url)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("signature_policy", &self.signature_policy)
            .finish()
    }
}

impl RelayConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|s| !s.is_empty());

        let signature_policy = match get("WEBHOOK_REQUIRE_SIGNATURE").as_deref() {
            Some("true") | Some("1") => SignaturePolicy::Require,
            _ => SignaturePolicy::TrustWhenUnconfigured,
        };

        Self {
            webhook_secret: get("WEBHOOK_SECRET"),
            api_token: get("CRYPTOBOT_TOKEN"),
            bot_token: get("BOT_TOKEN"),
            admin_chat_id: get("ADMIN_ID"),
            forward_url: get("FORWARD_URL"),
            relay_token: get("RELAY_TOKEN"),
            api_url: get("CRYPTOBOT_API_URL").unwrap_or_else(|| CRYPTOBOT_API_URL.to_string()),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| TELEGRAM_API_URL.to_string()),
            signature_policy,
        }
    }

    /// The webhook secret, or `""` when verification is not configured.
    pub fn webhook_secret(&self) -> &str {
        self.webhook_secret.as_deref().unwrap_or_default()
    }

    /// True when the policy demands a secret but none is configured.
    pub fn missing_required_secret(&self) -> bool {
        self.signature_policy == SignaturePolicy::Require && self.webhook_secret.is_none()
    }
}

/// Source of the relay configuration for one invocation.
///
/// The server reads [`EnvConfig`] on every request; tests hand in a fixed
/// [`RelayConfig`] instead of mutating the process environment.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> RelayConfig;
}

/// Reads [`RelayConfig::from_env`] on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn load(&self) -> RelayConfig {
        RelayConfig::from_env()
    }
}

impl ConfigSource for RelayConfig {
    fn load(&self) -> RelayConfig {
        self.clone()
    }
}

/// Check a forward URL before the server starts.
///
/// Only `http` and `https` are accepted. Plain `http` is allowed for local
/// backends but logged, since the relay token travels in a header.
pub fn validate_forward_url(forward_url: &str) -> Result<(), RelayError> {
    let url = Url::parse(forward_url)
        .map_err(|e| RelayError::Config(format!("invalid FORWARD_URL: {e}")))?;
    match url.scheme() {
        "https" => Ok(()),
        "http" => {
            tracing::warn!(
                url = %forward_url,
                "FORWARD_URL does not use HTTPS — relay token and payload will be sent in cleartext"
            );
            Ok(())
        }
        other => Err(RelayError::Config(format!(
            "FORWARD_URL must use http or https, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RelayConfig::from_lookup(lookup(&[]));
        assert!(config.webhook_secret.is_none());
        assert!(config.api_token.is_none());
        assert!(config.forward_url.is_none());
        assert_eq!(config.api_url, CRYPTOBOT_API_URL);
        assert_eq!(config.telegram_api_url, TELEGRAM_API_URL);
        assert_eq!(config.signature_policy, SignaturePolicy::TrustWhenUnconfigured);
        assert_eq!(config.webhook_secret(), "");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("WEBHOOK_SECRET", ""),
            ("CRYPTOBOT_TOKEN", ""),
            ("FORWARD_URL", ""),
        ]));
        assert!(config.webhook_secret.is_none());
        assert!(config.api_token.is_none());
        assert!(config.forward_url.is_none());
    }

    #[test]
    fn test_reads_all_settings() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("WEBHOOK_SECRET", "s"),
            ("CRYPTOBOT_TOKEN", "t"),
            ("BOT_TOKEN", "b"),
            ("ADMIN_ID", "42"),
            ("FORWARD_URL", "https://backend.example/hook"),
            ("RELAY_TOKEN", "r"),
            ("CRYPTOBOT_API_URL", "http://localhost:9/api"),
            ("WEBHOOK_REQUIRE_SIGNATURE", "true"),
        ]));
        assert_eq!(config.webhook_secret(), "s");
        assert_eq!(config.api_token.as_deref(), Some("t"));
        assert_eq!(config.bot_token.as_deref(), Some("b"));
        assert_eq!(config.admin_chat_id.as_deref(), Some("42"));
        assert_eq!(config.relay_token.as_deref(), Some("r"));
        assert_eq!(config.api_url, "http://localhost:9/api");
        assert_eq!(config.signature_policy, SignaturePolicy::Require);
        assert!(!config.missing_required_secret());
    }

    #[test]
    fn test_require_policy_without_secret() {
        let config = RelayConfig::from_lookup(lookup(&[("WEBHOOK_REQUIRE_SIGNATURE", "1")]));
        assert!(config.missing_required_secret());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("WEBHOOK_SECRET", "super-secret"),
            ("CRYPTOBOT_TOKEN", "api-token-value"),
            ("RELAY_TOKEN", "relay-value"),
        ]));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("api-token-value"));
        assert!(!debug.contains("relay-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_validate_forward_url() {
        assert!(validate_forward_url("https://backend.example/hook").is_ok());
        assert!(validate_forward_url("http://localhost:8000/hook").is_ok());
        assert!(validate_forward_url("ftp://backend.example").is_err());
        assert!(validate_forward_url("not a url").is_err());
    }
}
