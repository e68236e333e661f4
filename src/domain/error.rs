//! Fetch errors and their display form
//!
//! Errors coming back from the catalog are data: the store keeps them, the
//! views branch on their presence and hand them to [`format_error`] for
//! display. The formatter accepts any JSON shape and never panics because the
//! payload is whatever the server (or a proxy in front of it) sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const MAX_LINE_CHARS: usize = 240;
const MAX_LINES: usize = 12;

/// Error recorded by the store when a catalog call fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchError {
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
    /// Short human readable summary
    pub message: String,
    /// Raw response body or structured detail, `Null` when absent
    #[serde(default)]
    pub payload: Value,
}

impl FetchError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            payload: Value::Null,
        }
    }

    /// Build from an HTTP response; the body is kept as JSON when it parses,
    /// otherwise as a string.
    pub fn from_response(status: u16, body: &str) -> Self {
        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
        };
        Self {
            status: Some(status),
            message: format!("Request failed with status {status}"),
            payload,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

/// Severity of one formatted line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Error,
    Warning,
    Info,
}

/// Display-safe representation of an error
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDisplay {
    pub status: Option<u16>,
    pub lines: Vec<(MessageLevel, String)>,
}

impl ErrorDisplay {
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Format a recorded fetch error. Structured API-ML messages in the payload
/// win over the summary message.
pub fn format_error(error: &FetchError) -> ErrorDisplay {
    let mut display = format_value(&error.payload);
    if display.status.is_none() {
        display.status = error.status;
    }
    let has_detail = !display.lines.is_empty();
    if !has_detail {
        let message = if error.message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            error.message.clone()
        };
        display.lines.push((MessageLevel::Error, clip(&message)));
    }
    if let Some(status) = display.status {
        let prefix = format!("Status {status}");
        if !display.lines.iter().any(|(_, line)| line.starts_with(&prefix)) {
            display.lines.insert(0, (MessageLevel::Error, prefix));
        }
    }
    display.lines.truncate(MAX_LINES);
    display
}

/// Format an arbitrary error-shaped JSON value
pub fn format_value(value: &Value) -> ErrorDisplay {
    let mut display = ErrorDisplay {
        status: None,
        lines: Vec::new(),
    };
    collect(value, &mut display, 0);
    display.lines.truncate(MAX_LINES);
    display
}

fn collect(value: &Value, display: &mut ErrorDisplay, depth: usize) {
    if depth > 4 {
        return;
    }
    match value {
        Value::Null => {}
        Value::Bool(b) => display.lines.push((MessageLevel::Error, b.to_string())),
        Value::Number(n) => display.lines.push((MessageLevel::Error, n.to_string())),
        Value::String(s) => {
            if !s.trim().is_empty() {
                display.lines.push((MessageLevel::Error, clip(s.trim())));
            }
        }
        Value::Array(items) => {
            for item in items.iter().take(MAX_LINES) {
                collect(item, display, depth + 1);
            }
        }
        Value::Object(map) => {
            if display.status.is_none() {
                display.status = map
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|s| u16::try_from(s).ok());
            }
            if let Some(Value::Array(messages)) = map.get("messages") {
                for message in messages.iter().take(MAX_LINES) {
                    if let Some(line) = api_message_line(message) {
                        display.lines.push(line);
                    } else {
                        collect(message, display, depth + 1);
                    }
                }
                return;
            }
            if let Some(line) = api_message_line(value) {
                display.lines.push(line);
                return;
            }
            for key in ["message", "error", "detail", "reason"] {
                match map.get(key) {
                    Some(Value::String(s)) if !s.trim().is_empty() => {
                        display.lines.push((MessageLevel::Error, clip(s.trim())));
                        return;
                    }
                    Some(nested @ (Value::Object(_) | Value::Array(_))) => {
                        collect(nested, display, depth + 1);
                        return;
                    }
                    _ => {}
                }
            }
            if display.lines.is_empty() && !map.is_empty() {
                display
                    .lines
                    .push((MessageLevel::Error, clip(&value.to_string())));
            }
        }
    }
}

/// `{"messageNumber":"ZWEAS120E","messageContent":"...","messageType":"ERROR"}`
fn api_message_line(value: &Value) -> Option<(MessageLevel, String)> {
    let map = value.as_object()?;
    let content = map.get("messageContent").and_then(Value::as_str)?;
    let level = match map
        .get("messageType")
        .and_then(Value::as_str)
        .unwrap_or("ERROR")
        .to_ascii_uppercase()
        .as_str()
    {
        "WARNING" | "WARN" => MessageLevel::Warning,
        "INFO" | "DEBUG" | "TRACE" => MessageLevel::Info,
        _ => MessageLevel::Error,
    };
    let line = match map.get("messageNumber").and_then(Value::as_str) {
        Some(number) if !number.is_empty() => format!("{number} {content}"),
        _ => content.to_string(),
    };
    Some((level, clip(&line)))
}

fn clip(value: &str) -> String {
    if value.chars().count() <= MAX_LINE_CHARS {
        return value.to_string();
    }
    value.chars().take(MAX_LINE_CHARS).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_and_message() {
        let error = FetchError {
            status: Some(500),
            message: "boom".into(),
            payload: Value::Null,
        };
        let display = format_error(&error);
        assert_eq!(display.status, Some(500));
        assert!(display.text().contains("boom"));
        assert!(display.text().contains("Status 500"));
    }

    #[test]
    fn test_api_ml_message_envelope() {
        let payload = json!({
            "messages": [{
                "messageType": "ERROR",
                "messageNumber": "ZWEAC104E",
                "messageContent": "Could not retrieve containers",
                "messageKey": "org.zowe.apiml.apicatalog.containerCouldNotBeRetrieved"
            }]
        });
        let error = FetchError {
            status: Some(500),
            message: "Request failed with status 500".into(),
            payload,
        };
        let display = format_error(&error);
        assert!(display
            .lines
            .iter()
            .any(|(level, line)| *level == MessageLevel::Error
                && line == "ZWEAC104E Could not retrieve containers"));
        assert!(!display.text().contains("Request failed"));
    }

    #[test]
    fn test_odd_shapes_never_panic() {
        let shapes = [
            Value::Null,
            json!(42),
            json!(true),
            json!("plain text"),
            json!([]),
            json!([1, "two", {"message": "three"}]),
            json!({}),
            json!({"status": 70000}),
            json!({"messages": "not a list"}),
            json!({"messages": [null, 5, {"messageContent": 7}]}),
            json!({"a": {"b": {"c": {"d": {"e": {"f": "deep"}}}}}}),
        ];
        for shape in shapes {
            let _ = format_value(&shape);
            let _ = format_error(&FetchError {
                status: None,
                message: String::new(),
                payload: shape,
            });
        }
    }

    #[test]
    fn test_empty_error_still_has_text() {
        let display = format_error(&FetchError::new(None, ""));
        assert_eq!(display.text(), "Unknown error");
    }

    #[test]
    fn test_long_lines_are_clipped_on_char_boundary() {
        let long = "é".repeat(1000);
        let display = format_value(&Value::String(long));
        let (_, line) = &display.lines[0];
        assert_eq!(line.chars().count(), MAX_LINE_CHARS + 1);
    }

    #[test]
    fn test_from_response_keeps_non_json_body() {
        let error = FetchError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(error.payload, Value::String("<html>Bad Gateway</html>".into()));
        assert!(format_error(&error).text().contains("Bad Gateway"));
    }
}
