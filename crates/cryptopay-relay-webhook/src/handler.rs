//! The webhook pipeline.
//!
//! Each step either passes its result to the next one or ends the invocation
//! with a [`WebhookError`]. Outbound calls run one after another; nothing is
//! spawned.

use actix_web::http::Method;
use actix_web::web::{Bytes, Payload};

use cryptopay::{
    fetch_invoice_status, forward, notify_admin, payment_message, verify_signature, ForwardResult,
    InvoiceId, RelayConfig, WebhookPayload, STATUS_PAID,
};

use crate::error::WebhookError;

/// Result of a fully processed webhook.
#[derive(Debug)]
pub struct Processed {
    pub invoice_id: InvoiceId,
    pub confirmed_status: String,
    pub forward: ForwardResult,
    /// Whether an admin notification was delivered.
    pub notified: bool,
}

/// Buffer the request body up to `limit` bytes. Non-POST requests are
/// rejected before anything is read, so the method check stays first.
pub async fn read_body(
    method: &Method,
    payload: Payload,
    limit: usize,
) -> Result<Bytes, WebhookError> {
    if *method != Method::POST {
        return Err(WebhookError::MethodNotAllowed);
    }

    match payload.to_bytes_limited(limit).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to read webhook body");
            Err(WebhookError::BodyUnreadable)
        }
        Err(_) => {
            tracing::warn!(limit, "webhook body exceeds limit");
            Err(WebhookError::PayloadTooLarge)
        }
    }
}

/// Run one webhook invocation.
///
/// `signature` is the raw `X-Crypto-Pay-API-Signature` header value, if any.
/// `config` must be freshly loaded for this invocation.
pub async fn process(
    client: &reqwest::Client,
    config: &RelayConfig,
    method: &Method,
    signature: Option<&str>,
    body: Bytes,
) -> Result<Processed, WebhookError> {
    if *method != Method::POST {
        return Err(WebhookError::MethodNotAllowed);
    }

    let signature = signature.unwrap_or_default();
    check_signature(config, &body, signature)?;

    let payload = WebhookPayload::parse(&body).map_err(|e| {
        tracing::debug!(error = %e, "webhook body is not a JSON object");
        WebhookError::InvalidJson
    })?;
    let invoice_id = payload.invoice_id().ok_or(WebhookError::MissingInvoiceId)?;

    let api_token = config
        .api_token
        .as_deref()
        .ok_or(WebhookError::ApiTokenNotConfigured)?;

    let confirmed_status = fetch_invoice_status(client, &config.api_url, &invoice_id, api_token)
        .await
        .ok_or(WebhookError::PaymentNotFound)?;

    tracing::info!(
        invoice_id = %invoice_id,
        claimed = payload.status().unwrap_or("-"),
        confirmed = %confirmed_status,
        "invoice status confirmed"
    );

    let forward_result = forward(
        client,
        body,
        signature,
        config.forward_url.as_deref().unwrap_or_default(),
        config.relay_token.as_deref(),
    )
    .await
    .map_err(WebhookError::ForwardTransport)?;

    if !forward_result.ok {
        return Err(WebhookError::ForwardFailed {
            status: forward_result.status,
            text: forward_result.text,
        });
    }

    // Both the payload's claim and the provider's answer must say paid.
    let notified = if payload.claims_paid() && confirmed_status == STATUS_PAID {
        notify_admin(
            client,
            &config.telegram_api_url,
            &payment_message(&invoice_id, &payload),
            config.bot_token.as_deref(),
            config.admin_chat_id.as_deref(),
        )
        .await
    } else {
        false
    };

    Ok(Processed {
        invoice_id,
        confirmed_status,
        forward: forward_result,
        notified,
    })
}

fn check_signature(config: &RelayConfig, body: &[u8], signature: &str) -> Result<(), WebhookError> {
    if config.missing_required_secret() {
        tracing::error!("WEBHOOK_REQUIRE_SIGNATURE is set but WEBHOOK_SECRET is empty");
        return Err(WebhookError::SecretNotConfigured);
    }

    if verify_signature(body, signature, config.webhook_secret()) {
        return Ok(());
    }

    if signature.is_empty() {
        tracing::warn!("webhook signature header missing");
        Err(WebhookError::SignatureMissing)
    } else {
        tracing::warn!("webhook signature mismatch");
        Err(WebhookError::SignatureInvalid)
    }
}
