//! Request schema validation.
//!
//! Checks run in a fixed order and the first violation wins, so the
//! extension always sees the same message for the same malformed request:
//! missing fields (reported together), then the action sentinel, then field
//! types, then the kind enum.

use serde_json::Value;

use webstash_shared::{CAPTURE_ACTION, CaptureKind, CaptureRequest, Result, WebstashError};

/// Required top-level keys, in reporting order.
const REQUIRED_FIELDS: [&str; 4] = ["action", "url", "kind", "content"];

/// Validate a decoded request payload into a [`CaptureRequest`].
pub fn validate_request(value: &Value) -> Result<CaptureRequest> {
    let Some(message) = value.as_object() else {
        return Err(WebstashError::validation("Message must be an object"));
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !message.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(WebstashError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let action = &message["action"];
    if action.as_str() != Some(CAPTURE_ACTION) {
        return Err(WebstashError::validation(format!(
            "Invalid action: expected '{CAPTURE_ACTION}', got '{}'",
            display_value(action)
        )));
    }

    let Some(url) = message["url"].as_str() else {
        return Err(WebstashError::validation("url must be a string"));
    };

    let Some(content) = message["content"].as_str() else {
        return Err(WebstashError::validation("content must be a string"));
    };

    let kind_value = &message["kind"];
    let Some(kind) = kind_value.as_str().and_then(CaptureKind::parse) else {
        let expected = CaptureKind::ALL.map(|k| k.as_str()).join(", ");
        return Err(WebstashError::validation(format!(
            "Invalid kind: expected one of {expected}, got '{}'",
            display_value(kind_value)
        )));
    };

    Ok(CaptureRequest {
        url: url.to_string(),
        kind,
        content: content.to_string(),
    })
}

/// Render a JSON value inside an error message the way the extension's logs
/// expect: bare text for strings, JSON for everything else.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
