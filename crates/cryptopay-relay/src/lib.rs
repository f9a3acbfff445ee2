//! Crypto Pay webhook relay.
//!
//! Building blocks for a webhook endpoint that accepts invoice callbacks from
//! the Crypto Pay provider, checks them, and relays them onward.
//!
//! # Pipeline pieces
//!
//! - [`hmac`] — provider signature verification over the raw body
//! - [`payload`] — the callback body ([`WebhookPayload`], [`InvoiceId`])
//! - [`invoice`] — independent status confirmation via the provider API
//! - [`forward`] — pass-through relay to the downstream backend
//! - [`notify`] — best-effort Telegram admin notification
//! - [`config`] — per-invocation configuration ([`RelayConfig`], [`ConfigSource`])
//!
//! The HTTP server that strings these together lives in `cryptopay-relay-webhook`.

pub mod config;
pub mod constants;
pub mod error;
pub mod forward;
pub mod hmac;
pub mod invoice;
pub mod notify;
pub mod payload;
pub mod security;

pub use config::{ConfigSource, EnvConfig, RelayConfig, SignaturePolicy};
pub use constants::*;
pub use error::RelayError;
pub use forward::{forward, ForwardResult};
pub use crate::hmac::{compute_signature, verify_signature};
pub use invoice::fetch_invoice_status;
pub use notify::{notify_admin, payment_message};
pub use payload::{InvoiceId, WebhookPayload};
