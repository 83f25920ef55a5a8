//! Canonical search responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{MediatorError, MediatorResult};
use crate::service::SearchAdapter;

/// The unified search response returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchEnvelope {
    /// Total number of matches reported by the provider.
    pub total_result_count: u64,
    /// One object per result, holding the requested canonical fields.
    pub results: Vec<Map<String, Value>>,
    /// Non-fatal problems met while handling the request.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Warning messages collected over one request.
///
/// Repeated messages are kept once, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    messages: Vec<String>,
}

impl Warnings {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn add(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.messages.contains(&message) {
            return;
        }
        warn!(warning = %message, "Response warning");
        self.messages.push(message);
    }

    /// Number of distinct warnings.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates over the recorded messages.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Consumes the collector.
    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }
}

/// Warning text for a requested field the provider cannot produce.
pub fn unsupported_field_warning(field: &str) -> String {
    format!("Can't return unsupported field {}", field)
}

/// Translates one provider result into the requested canonical fields.
///
/// Fields that fail to translate are left out and reported in `warnings`.
pub fn translate_single_result(
    adapter: &dyn SearchAdapter,
    result: &Value,
    requested_fields: &[String],
    warnings: &mut Warnings,
) -> Map<String, Value> {
    let mut translated = Map::new();
    for field in requested_fields {
        match adapter.fields().translate_field(field, result) {
            Ok(value) => {
                translated.insert(field.clone(), value);
            }
            Err(e) => {
                debug!(service = adapter.name(), error = %e, "Field translation failed");
                warnings.add(unsupported_field_warning(field));
            }
        }
    }
    translated
}

/// Translates a raw provider response into a [`SearchEnvelope`].
///
/// `warnings` may already hold request-level warnings; they stay first.
pub fn translate_response(
    adapter: &dyn SearchAdapter,
    raw: &Value,
    requested_fields: &[String],
    mut warnings: Warnings,
) -> MediatorResult<SearchEnvelope> {
    let total_result_count =
        adapter
            .total_count(raw)
            .ok_or_else(|| MediatorError::UnexpectedResponse {
                service: adapter.name().to_string(),
                message: "could not read the total result count".to_string(),
            })?;
    let raw_results = adapter
        .results(raw)
        .ok_or_else(|| MediatorError::UnexpectedResponse {
            service: adapter.name().to_string(),
            message: "could not read the result list".to_string(),
        })?;

    let results = raw_results
        .iter()
        .map(|result| translate_single_result(adapter, result, requested_fields, &mut warnings))
        .collect();

    Ok(SearchEnvelope {
        total_result_count,
        results,
        warnings: warnings.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_deduplicated_in_order() {
        let mut warnings = Warnings::new();
        warnings.add("b");
        warnings.add("a");
        warnings.add("b");
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings.into_vec(), vec!["b", "a"]);
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = SearchEnvelope {
            total_result_count: 3,
            results: vec![Map::new()],
            warnings: vec![unsupported_field_warning("bitdepth")],
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["total_result_count"], 3);
        assert_eq!(json["results"], serde_json::json!([{}]));
        assert_eq!(
            json["warnings"][0],
            "Can't return unsupported field bitdepth"
        );
    }
}
