//! Best-effort admin notifications through the Telegram Bot API.

use crate::payload::{InvoiceId, WebhookPayload};

/// Text of the "payment received" admin message.
pub fn payment_message(invoice_id: &InvoiceId, payload: &WebhookPayload) -> String {
    format!(
        "✅ Payment received\nInvoice: {}\nAmount: {} {}",
        invoice_id,
        payload.amount_text(),
        payload.currency_text()
    )
}

/// Send `message` to the admin chat.
///
/// Does nothing unless both the bot token and the chat id are set. Every
/// failure is swallowed: a notification must never change the response
/// returned to the webhook sender. Returns whether the message was accepted.
pub async fn notify_admin(
    client: &reqwest::Client,
    telegram_api_url: &str,
    message: &str,
    bot_token: Option<&str>,
    chat_id: Option<&str>,
) -> bool {
    let (Some(token), Some(chat_id)) = (
        bot_token.filter(|t| !t.is_empty()),
        chat_id.filter(|c| !c.is_empty()),
    ) else {
        return false;
    };

    let url = format!(
        "{}/bot{}/sendMessage",
        telegram_api_url.trim_end_matches('/'),
        token
    );

    match client
        .post(&url)
        .json(&serde_json::json!({ "chat_id": chat_id, "text": message }))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::debug!("admin notification delivered");
            true
        }
        Ok(resp) => {
            tracing::warn!(status = %resp.status(), "admin notification rejected");
            false
        }
        // The URL embeds the bot token, so log without it.
        Err(e) => {
            tracing::warn!(error = %e.without_url(), "admin notification failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_payment_message_format() {
        let payload = WebhookPayload::parse(
            br#"{"invoice_id":77,"status":"paid","amount":"10.5","currency":"TON"}"#,
        )
        .unwrap();
        let id = payload.invoice_id().unwrap();
        assert_eq!(
            payment_message(&id, &payload),
            "✅ Payment received\nInvoice: 77\nAmount: 10.5 TON"
        );
    }

    #[test]
    fn test_payment_message_without_amount() {
        let payload = WebhookPayload::parse(br#"{"invoice_id":"A1"}"#).unwrap();
        let id = payload.invoice_id().unwrap();
        assert_eq!(
            payment_message(&id, &payload),
            "✅ Payment received\nInvoice: A1\nAmount:  "
        );
    }

    #[tokio::test]
    async fn test_sends_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botBOT:TOKEN/sendMessage"))
            .and(body_json(json!({ "chat_id": "42", "text": "hi" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let sent = notify_admin(&client, &server.uri(), "hi", Some("BOT:TOKEN"), Some("42")).await;
        assert!(sent);
    }

    #[tokio::test]
    async fn test_noop_without_token_or_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        assert!(!notify_admin(&client, &server.uri(), "hi", None, Some("42")).await);
        assert!(!notify_admin(&client, &server.uri(), "hi", Some("t"), None).await);
        assert!(!notify_admin(&client, &server.uri(), "hi", Some(""), Some("42")).await);
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        assert!(!notify_admin(&client, &server.uri(), "hi", Some("t"), Some("1")).await);
        assert!(!notify_admin(&client, "http://127.0.0.1:1", "hi", Some("t"), Some("1")).await);
    }
}
