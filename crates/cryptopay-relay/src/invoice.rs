//! Invoice status lookup against the Crypto Pay API.

use serde::Deserialize;

use crate::constants::API_TOKEN_HEADER;
use crate::payload::InvoiceId;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    result: Option<InvoiceResult>,
}

#[derive(Debug, Deserialize)]
struct InvoiceResult {
    status: Option<String>,
}

/// Ask the provider for the current status of an invoice.
///
/// Returns `None` on a non-success HTTP status, an `ok: false` body, a body
/// without a status, or any transport or parse failure. The caller treats all
/// of these as "payment not found".
pub async fn fetch_invoice_status(
    client: &reqwest::Client,
    api_url: &str,
    invoice_id: &InvoiceId,
    api_token: &str,
) -> Option<String> {
    let url = format!("{}/getInvoice", api_url.trim_end_matches('/'));

    let resp = match client
        .post(&url)
        .header(API_TOKEN_HEADER, api_token)
        .json(&serde_json::json!({ "invoice_id": invoice_id }))
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(invoice_id = %invoice_id, error = %e, "invoice lookup request failed");
            return None;
        }
    };

    if !resp.status().is_success() {
        tracing::warn!(
            invoice_id = %invoice_id,
            status = %resp.status(),
            "invoice lookup returned non-success status"
        );
        return None;
    }

    let body: ApiResponse = match resp.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(invoice_id = %invoice_id, error = %e, "invoice lookup response parse failed");
            return None;
        }
    };

    if !body.ok {
        tracing::debug!(invoice_id = %invoice_id, "provider reported ok=false for invoice lookup");
        return None;
    }

    body.result
        .and_then(|r| r.status)
        .filter(|s| !s.is_empty())
}
