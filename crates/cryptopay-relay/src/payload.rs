use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::constants::STATUS_PAID;

/// Invoice status callback as posted by the provider.
///
/// Fields are kept as raw JSON values: the provider is not consistent about
/// numeric vs. string ids, and a field of an unexpected type must not turn a
/// well-formed body into a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub invoice_id: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<Value>,
}

impl WebhookPayload {
    /// Parse a raw webhook body. The body must be a JSON object.
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_slice(body)?;
        serde_json::from_value(Value::Object(object))
    }

    /// The invoice id, if present and non-empty.
    pub fn invoice_id(&self) -> Option<InvoiceId> {
        self.invoice_id.as_ref().and_then(InvoiceId::from_value)
    }

    /// The self-reported status, when it is a string.
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().and_then(Value::as_str)
    }

    /// Whether the payload claims the invoice is paid. Never sufficient on its
    /// own; callers must also check the confirmed status.
    pub fn claims_paid(&self) -> bool {
        self.status() == Some(STATUS_PAID)
    }

    pub fn amount_text(&self) -> String {
        scalar_text(self.amount.as_ref())
    }

    pub fn currency_text(&self) -> String {
        scalar_text(self.currency.as_ref())
    }
}

fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Provider invoice identifier. Sent back to the provider in the same JSON
/// type it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InvoiceId {
    Number(Number),
    Text(String),
}

impl InvoiceId {
    /// Accepts a non-empty string or a non-zero number. `null`, `""`, `0`,
    /// booleans and containers are treated as a missing id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(InvoiceId::Text(s.clone())),
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
                Some(InvoiceId::Number(n.clone()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceId::Number(n) => write!(f, "{n}"),
            InvoiceId::Text(s) => f.write_str(s),
        }
    }
}
