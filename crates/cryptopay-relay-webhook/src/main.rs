use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cryptopay::{RelayConfig, SignaturePolicy};
use cryptopay_webhook::{config::ServerConfig, metrics::register_metrics, routes, state::AppState};

/// Report on the relay settings as they stand at startup. They are re-read
/// per request, so this only catches what is already wrong.
fn check_relay_config() -> Result<(), cryptopay_webhook::config::ConfigError> {
    let relay = RelayConfig::from_env();

    match (&relay.webhook_secret, relay.signature_policy) {
        (Some(secret), _) if secret.len() < 16 => {
            tracing::warn!(
                "WEBHOOK_SECRET is only {} bytes — use the secret issued by the provider",
                secret.len()
            );
        }
        (Some(_), _) => {}
        (None, SignaturePolicy::TrustWhenUnconfigured) => {
            tracing::warn!(
                "⚠️  WEBHOOK_SECRET not set — webhook signatures are NOT verified. \
                 Set WEBHOOK_REQUIRE_SIGNATURE=true to refuse unsigned webhooks."
            );
        }
        (None, SignaturePolicy::Require) => {
            tracing::error!(
                "WEBHOOK_REQUIRE_SIGNATURE=true but WEBHOOK_SECRET is not set — \
                 every webhook will be answered with 500"
            );
        }
    }

    if relay.api_token.is_none() {
        tracing::error!("CRYPTOBOT_TOKEN not set — invoice confirmation will fail with 500");
    }

    match &relay.forward_url {
        Some(url) => {
            cryptopay::config::validate_forward_url(url)?;
            tracing::info!("Forwarding to: {url}");
            if relay.relay_token.is_none() {
                tracing::warn!("RELAY_TOKEN not set — backend cannot authenticate relayed webhooks");
            }
        }
        None => tracing::info!("FORWARD_URL not set — forwarding disabled"),
    }

    if relay.bot_token.is_some() != relay.admin_chat_id.is_some() {
        tracing::warn!("Admin notifications need both BOT_TOKEN and ADMIN_ID — notifications disabled");
    }

    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = check_relay_config() {
        tracing::error!("Invalid relay configuration: {e}");
        std::process::exit(1);
    }

    register_metrics();

    let state = match AppState::new(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let rate_limit = match routes::rate_limit(config.rate_limit_rpm) {
        Some(conf) => conf,
        None => {
            tracing::error!("Invalid rate limit: {} req/min", config.rate_limit_rpm);
            std::process::exit(1);
        }
    };

    let port = config.port;
    let webhook_path = config.webhook_path.clone();

    tracing::info!("Crypto Pay webhook relay listening on port {port}");
    tracing::info!(
        "Rate limit: {} req/min per IP on /health and /metrics",
        config.rate_limit_rpm
    );
    tracing::info!("  POST http://localhost:{port}{webhook_path}");
    tracing::info!("  GET  http://localhost:{port}/health");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(|cfg| routes::configure(cfg, &webhook_path, &rate_limit))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
