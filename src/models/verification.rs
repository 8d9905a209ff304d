//! Result of a call to the verification endpoint.
//!
//! # Expected Body
//!
//! ```json
//! { "success": true }
//! { "success": false, "message": "face mismatch" }
//! ```
//!
//! The body is parsed leniently: an empty or non-JSON body becomes `None`
//! instead of an error, which only changes the failure message text.

use serde_json::Value;

/// HTTP status and parsed body returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    pub status: u16,
    pub body: Option<Value>,
}

impl VerificationOutcome {
    /// Build an outcome from a status and raw body text.
    pub fn from_raw(status: u16, text: &str) -> Self {
        Self {
            status,
            body: serde_json::from_str(text).ok(),
        }
    }

    /// 2xx status AND a truthy `success` field.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.field("success").is_some_and(is_truthy)
    }

    /// Message to show when [`is_success`](Self::is_success) is false.
    ///
    /// A truthy `message` field is used as-is; otherwise the status code.
    pub fn failure_message(&self) -> String {
        match self.field("message") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(v) if is_truthy(v) => v.to_string(),
            _ => format!("HTTP error! Status: {}", self.status),
        }
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get(name))
    }
}

/// JavaScript truthiness for JSON values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
