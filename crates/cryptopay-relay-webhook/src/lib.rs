//! Crypto Pay webhook server.
//!
//! Receives invoice callbacks, verifies the provider signature, confirms the
//! status with the provider API, relays the untouched body to a backend, and
//! notifies an admin when a payment lands. The pipeline pieces live in the
//! core [`cryptopay`] crate; this crate provides the HTTP server around them.
//!
//! # Modules
//!
//! - [`handler`] — the ordered webhook pipeline ([`handler::process`])
//! - [`routes`] — HTTP endpoints (webhook, health, metrics)
//! - [`error`] — [`WebhookError`](error::WebhookError) and its HTTP mapping
//! - [`config`] — startup configuration ([`ServerConfig`](config::ServerConfig))
//! - [`state`] — shared [`AppState`](state::AppState)
//! - [`metrics`] — Prometheus counters for webhook outcomes

pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::WebhookError;
pub use state::AppState;
