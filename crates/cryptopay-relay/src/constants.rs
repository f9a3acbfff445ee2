/// Crypto Pay API base URL (mainnet).
pub const CRYPTOBOT_API_URL: &str = "https://pay.crypt.bot/api";

/// Crypto Pay API base URL (testnet).
pub const CRYPTOBOT_TESTNET_API_URL: &str = "https://testnet-pay.crypt.bot/api";

/// Telegram Bot API base URL.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Header carrying the provider's HMAC over the raw webhook body.
pub const SIGNATURE_HEADER: &str = "X-Crypto-Pay-API-Signature";

/// Header carrying the provider API token on outbound lookups.
pub const API_TOKEN_HEADER: &str = "Crypto-Pay-API-Token";

/// Static marker identifying requests relayed by this service.
pub const FORWARDED_BY_HEADER: &str = "X-Forwarded-By";
pub const FORWARDED_BY_VALUE: &str = "cryptopay-relay";

/// Shared secret proving the relay origin to the downstream backend.
pub const RELAY_TOKEN_HEADER: &str = "X-Relay-Token";

/// Invoice status that triggers the admin notification.
pub const STATUS_PAID: &str = "paid";

/// Status code reported when forwarding is not configured.
pub const FORWARD_SKIPPED_STATUS: u16 = 204;
