use bytes::Bytes;

use crate::constants::{
    FORWARDED_BY_HEADER, FORWARDED_BY_VALUE, FORWARD_SKIPPED_STATUS, RELAY_TOKEN_HEADER,
    SIGNATURE_HEADER,
};
use crate::error::RelayError;

/// Outcome of relaying a webhook to the downstream backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardResult {
    pub ok: bool,
    pub status: u16,
    /// Response body, best-effort. Empty if it could not be read.
    pub text: String,
}

impl ForwardResult {
    /// Result reported when no forward URL is configured.
    pub fn skipped() -> Self {
        Self {
            ok: true,
            status: FORWARD_SKIPPED_STATUS,
            text: String::new(),
        }
    }
}

/// Re-POST the original webhook body to the backend.
///
/// The body is passed through byte-for-byte so the backend can verify the
/// provider signature itself. An empty `forward_url` skips the call. Transport
/// failures are returned as [`RelayError::Transport`]; a non-2xx response is
/// not an error and is reported through [`ForwardResult::ok`].
pub async fn forward(
    client: &reqwest::Client,
    raw_body: Bytes,
    original_signature: &str,
    forward_url: &str,
    relay_token: Option<&str>,
) -> Result<ForwardResult, RelayError> {
    if forward_url.is_empty() {
        return Ok(ForwardResult::skipped());
    }

    let mut request = client
        .post(forward_url)
        .header("Content-Type", "application/json")
        .header(SIGNATURE_HEADER, original_signature)
        .header(FORWARDED_BY_HEADER, FORWARDED_BY_VALUE);

    if let Some(token) = relay_token.filter(|t| !t.is_empty()) {
        request = request.header(RELAY_TOKEN_HEADER, token);
    }

    let resp = request.body(raw_body).send().await?;

    let status = resp.status();
    let text = match resp.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "failed to read forward response body");
            String::new()
        }
    };

    Ok(ForwardResult {
        ok: status.is_success(),
        status: status.as_u16(),
        text,
    })
}
