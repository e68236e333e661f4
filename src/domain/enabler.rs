//! Onboarding enablers offered by the "Onboard New API" dropdown

use serde_json::{json, Value};

/// One onboarding method. Dispatch always uses `id`; `label` is display only.
#[derive(Debug, Clone, PartialEq)]
pub struct EnablerOption {
    pub id: String,
    pub label: String,
    pub payload: Value,
}

impl EnablerOption {
    /// Parse a dropdown source value.
    ///
    /// Returns `None` unless `data` is a JSON array. Entries without a usable
    /// `label` (or legacy `text`) are skipped; `id` falls back to the label.
    pub fn parse_list(data: &Value) -> Option<Vec<EnablerOption>> {
        let items = data.as_array()?;
        let options = items
            .iter()
            .filter_map(|item| {
                let map = item.as_object()?;
                let label = map
                    .get("label")
                    .or_else(|| map.get("text"))
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|label| !label.is_empty())?;
                let id = map
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .unwrap_or(label);
                Some(EnablerOption {
                    id: id.to_string(),
                    label: label.to_string(),
                    payload: map.get("payload").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();
        Some(options)
    }

    /// Whether the wizard should produce a static definition file rather than
    /// an enabler configuration.
    pub fn is_static(&self) -> bool {
        self.payload
            .get("kind")
            .and_then(Value::as_str)
            .map(|kind| kind == "static")
            .unwrap_or(false)
    }
}

/// Built-in onboarding methods, used when the config does not override them
pub fn default_enablers() -> Value {
    json!([
        { "id": "plain-java", "label": "Plain Java Enabler", "payload": { "kind": "enabler" } },
        { "id": "spring", "label": "Spring Enabler", "payload": { "kind": "enabler" } },
        { "id": "micronaut", "label": "Micronaut Enabler", "payload": { "kind": "enabler" } },
        { "id": "nodejs", "label": "Node JS Enabler", "payload": { "kind": "enabler" } },
        { "id": "static", "label": "Static Onboarding", "payload": { "kind": "static" } },
        { "id": "eureka", "label": "Direct Call to Eureka", "payload": { "kind": "enabler" } }
    ])
}
