use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response bodies are returned exactly as the server sent them.
pub type ApiResponse = Value;

/// Error payload shapes the API is known to send on failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl ErrorResponse {
    pub fn from_value(body: &Value) -> Option<Self> {
        serde_json::from_value(body.clone()).ok()
    }

    /// `detail` wins over `message`; empty strings and nulls are skipped.
    pub fn text(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(field_text)
            .or_else(|| self.message.as_ref().and_then(field_text))
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
