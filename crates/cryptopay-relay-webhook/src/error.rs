use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use cryptopay::RelayError;

/// Every early exit of the webhook pipeline.
#[derive(Debug)]
pub enum WebhookError {
    /// Anything other than POST
    MethodNotAllowed,
    /// Body larger than the configured limit
    PayloadTooLarge,
    /// Body stream failed before it was fully read
    BodyUnreadable,
    /// Secret configured, signature header absent or empty
    SignatureMissing,
    /// Secret configured, signature does not match
    SignatureInvalid,
    /// Signature policy requires a secret but none is configured
    SecretNotConfigured,
    /// Body is not a JSON object
    InvalidJson,
    /// `invoice_id` missing, null or empty
    MissingInvoiceId,
    /// Provider API token not configured
    ApiTokenNotConfigured,
    /// Provider lookup failed or returned no status
    PaymentNotFound,
    /// Backend answered with a non-success status
    ForwardFailed { status: u16, text: String },
    /// Backend could not be reached
    ForwardTransport(RelayError),
}

impl WebhookError {
    /// Stable label for metrics and the `error` field of the response body.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MethodNotAllowed => "method_not_allowed",
            WebhookError::PayloadTooLarge => "payload_too_large",
            WebhookError::BodyUnreadable => "invalid_body",
            WebhookError::SignatureMissing => "signature_missing",
            WebhookError::SignatureInvalid => "invalid_signature",
            WebhookError::SecretNotConfigured => "secret_not_configured",
            WebhookError::InvalidJson => "invalid_json",
            WebhookError::MissingInvoiceId => "missing_invoice_id",
            WebhookError::ApiTokenNotConfigured => "api_token_not_configured",
            WebhookError::PaymentNotFound => "payment_not_found",
            WebhookError::ForwardFailed { .. } => "forward_failed",
            WebhookError::ForwardTransport(_) => "forward_unreachable",
        }
    }
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            WebhookError::PayloadTooLarge => write!(f, "Payload too large"),
            WebhookError::BodyUnreadable => write!(f, "Could not read request body"),
            WebhookError::SignatureMissing | WebhookError::SignatureInvalid => {
                write!(f, "Invalid signature")
            }
            WebhookError::SecretNotConfigured => {
                write!(f, "Server not configured: WEBHOOK_SECRET missing")
            }
            WebhookError::InvalidJson => write!(f, "Invalid JSON"),
            WebhookError::MissingInvoiceId => write!(f, "Invoice ID not found"),
            WebhookError::ApiTokenNotConfigured => {
                write!(f, "Server not configured: CRYPTOBOT_TOKEN missing")
            }
            WebhookError::PaymentNotFound => write!(f, "Payment info not found"),
            WebhookError::ForwardFailed { status, text } => {
                write!(f, "Forward failed ({}): {}", status, text)
            }
            WebhookError::ForwardTransport(_) => write!(f, "Forward failed: backend unreachable"),
        }
    }
}

impl std::error::Error for WebhookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebhookError::ForwardTransport(e) => Some(e),
            _ => None,
        }
    }
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            WebhookError::SignatureMissing | WebhookError::SignatureInvalid => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::BodyUnreadable
            | WebhookError::InvalidJson
            | WebhookError::MissingInvoiceId
            | WebhookError::PaymentNotFound => StatusCode::BAD_REQUEST,
            WebhookError::SecretNotConfigured | WebhookError::ApiTokenNotConfigured => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WebhookError::ForwardFailed { .. } | WebhookError::ForwardTransport(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            WebhookError::MethodNotAllowed => {
                builder.insert_header((header::ALLOW, "POST"));
                builder.json(serde_json::json!({
                    "error": self.code(),
                    "message": self.to_string(),
                }))
            }
            WebhookError::ForwardFailed { status, text } => builder.json(serde_json::json!({
                "error": self.code(),
                "message": self.to_string(),
                "upstreamStatus": status,
                "upstreamBody": text,
            })),
            WebhookError::ForwardTransport(e) => {
                tracing::error!(error = %e, "forward to backend failed");
                builder.json(serde_json::json!({
                    "error": self.code(),
                    "message": self.to_string(),
                    "upstreamStatus": null,
                    "upstreamBody": "",
                }))
            }
            _ => builder.json(serde_json::json!({
                "error": self.code(),
                "message": self.to_string(),
            })),
        }
    }
}
