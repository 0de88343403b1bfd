use serde::Deserialize;
use serde_json::Value;

/// Fields a notification payload must carry as non-empty strings.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "summary", "author_name", "created_at", "url"];

/// An accepted notification payload. Only constructed after the
/// required-field scan has passed.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub summary: String,
    pub author_name: String,
    pub created_at: String,
    pub url: String,
}

/// Scan a parsed JSON payload for required fields that are absent, empty,
/// or not strings. Returns the offending names in declaration order.
pub fn missing_fields(payload: &Value) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| {
            !payload
                .get(field)
                .and_then(Value::as_str)
                .map_or(false, |value| !value.is_empty())
        })
        .collect()
}
