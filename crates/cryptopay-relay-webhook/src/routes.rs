use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};
use actix_web::{web, HttpRequest, HttpResponse};

use cryptopay::security::{bearer_token, constant_time_eq};
use cryptopay::SIGNATURE_HEADER;

use crate::error::WebhookError;
use crate::handler;
use crate::metrics;
use crate::state::AppState;

/// Per-IP limiter shared by the operational endpoints.
pub type RateLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// `None` when `requests_per_minute` is zero.
pub fn rate_limit(requests_per_minute: u64) -> Option<RateLimit> {
    GovernorConfigBuilder::default()
        .requests_per_minute(requests_per_minute)
        .finish()
}

/// Mount the webhook on `path`, plus /health and /metrics.
///
/// Every method is routed to the webhook handler so the pipeline itself
/// answers non-POST requests with 405. The webhook itself is never rate
/// limited; `rate_limit` applies to /health and /metrics only.
pub fn configure(cfg: &mut web::ServiceConfig, path: &str, rate_limit: &RateLimit) {
    cfg.service(web::resource(path).to(webhook))
        .service(
            web::resource("/health")
                .route(web::get().to(health))
                .wrap(Governor::new(rate_limit)),
        )
        .service(
            web::resource("/metrics")
                .route(web::get().to(metrics_endpoint))
                .wrap(Governor::new(rate_limit)),
        );
}

pub async fn webhook(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Payload,
) -> Result<HttpResponse, WebhookError> {
    let start = std::time::Instant::now();

    // Fresh per invocation, never cached.
    let config = state.config_source.load();

    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let result = match handler::read_body(req.method(), payload, state.max_body_bytes).await {
        Ok(body) => {
            handler::process(&state.http_client, &config, req.method(), signature, body).await
        }
        Err(e) => Err(e),
    };

    let elapsed = start.elapsed().as_secs_f64();

    match result {
        Ok(processed) => {
            metrics::WEBHOOK_REQUESTS.with_label_values(&["ok"]).inc();
            metrics::WEBHOOK_LATENCY
                .with_label_values(&["ok"])
                .observe(elapsed);
            let forwarded = config.forward_url.is_some();
            if forwarded {
                metrics::FORWARDS.with_label_values(&["success"]).inc();
            }
            if processed.notified {
                metrics::NOTIFICATIONS.inc();
            }
            tracing::info!(
                invoice_id = %processed.invoice_id,
                confirmed = %processed.confirmed_status,
                forward_status = processed.forward.status,
                notified = processed.notified,
                "webhook processed"
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "status": "ok",
                "message": "Webhook processed and forwarded",
                "invoiceId": processed.invoice_id,
                "confirmedStatus": processed.confirmed_status,
                "forwarded": forwarded,
            })))
        }
        Err(e) => {
            let code = e.code();
            metrics::WEBHOOK_REQUESTS.with_label_values(&[code]).inc();
            metrics::WEBHOOK_LATENCY
                .with_label_values(&[code])
                .observe(elapsed);
            match &e {
                WebhookError::SignatureMissing => {
                    metrics::SIGNATURE_FAILURES
                        .with_label_values(&["missing"])
                        .inc();
                }
                WebhookError::SignatureInvalid => {
                    metrics::SIGNATURE_FAILURES
                        .with_label_values(&["invalid"])
                        .inc();
                }
                WebhookError::ForwardFailed { status, .. } => {
                    metrics::FORWARDS.with_label_values(&["rejected"]).inc();
                    tracing::warn!(upstream_status = status, "backend rejected forwarded webhook");
                }
                WebhookError::ForwardTransport(_) => {
                    metrics::FORWARDS.with_label_values(&["error"]).inc();
                }
                _ => tracing::info!(outcome = code, "webhook rejected"),
            }
            Err(e)
        }
    }
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "cryptopay-webhook",
    }))
}

pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match &state.metrics_token {
        Some(token) => {
            let authorized = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(bearer_token)
                .map(|t| constant_time_eq(t.as_bytes(), token))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Valid Bearer token required for /metrics"
                }));
            }
        }
        None => {
            // No token configured: protected unless explicitly public.
            if !state.public_metrics {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "forbidden",
                    "message": "Set METRICS_TOKEN or PUBLIC_METRICS=true to access /metrics"
                }));
            }
        }
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}
