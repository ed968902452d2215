use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: its id plus an opaque field map.
///
/// Serialises flat, with `id` alongside the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// `enabled` that is absent (or not a boolean) counts as `true`.
    pub fn is_enabled(&self) -> bool {
        self.fields
            .get("enabled")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serialises_flat() {
        let record: Record =
            serde_json::from_value(json!({"id": "p1", "category": "design"})).unwrap();
        assert_eq!(record.id, "p1");
        assert_eq!(record.get_str("category"), Some("design"));
        assert!(!record.fields.contains_key("id"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "p1", "category": "design"}));
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let absent: Record = serde_json::from_value(json!({"id": "a"})).unwrap();
        let on: Record = serde_json::from_value(json!({"id": "b", "enabled": true})).unwrap();
        let off: Record = serde_json::from_value(json!({"id": "c", "enabled": false})).unwrap();
        assert!(absent.is_enabled());
        assert!(on.is_enabled());
        assert!(!off.is_enabled());
    }
}
