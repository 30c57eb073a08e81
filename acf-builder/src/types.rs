//! Core entry types shared by collections and builders.
//!
//! A collection holds [`FieldEntry`] values: structured field builders,
//! raw configuration mappings supplied by the caller, or opaque values that
//! are passed through untouched. Only the first two carry a name and take
//! part in collision checks.

use serde_json::{Map, Value};

use crate::field::FieldBuilder;
use crate::naming::prefix_field_key;

/// Marker left on mappings whose `key`/`field` must not be namespaced.
pub const CUSTOM_KEY_MARKER: &str = "_has_custom_key";

/// Marker left on repeaters whose `collapsed` names a custom-key sub-field.
pub const CUSTOM_COLLAPSED_MARKER: &str = "_has_custom_collapsed";

/// Marker left on conditional clauses whose field could not be found.
pub const MISSING_FIELD_MARKER: &str = "_field_does_not_exist";

/// Something that owns a name used for key namespacing.
pub trait NamedBuilder {
    fn name(&self) -> &str;
}

/// One item of a field collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEntry {
    /// A field built through the fluent API.
    Field(FieldBuilder),
    /// A configuration mapping supplied as-is; named when it has a `name` key.
    Raw(Map<String, Value>),
    /// Any other value, never named.
    Opaque(Value),
}

impl FieldEntry {
    /// The name used for collision checks and lookups, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldEntry::Field(field) => Some(field.name()),
            FieldEntry::Raw(map) => map.get("name").and_then(Value::as_str),
            FieldEntry::Opaque(_) => None,
        }
    }

    /// The un-namespaced key this entry will be emitted with.
    pub fn key(&self) -> Option<String> {
        match self {
            FieldEntry::Field(field) => Some(field.get_key()),
            FieldEntry::Raw(map) => map
                .get("key")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| self.name().map(prefix_field_key)),
            FieldEntry::Opaque(_) => None,
        }
    }

    pub fn has_custom_key(&self) -> bool {
        matches!(self, FieldEntry::Field(field) if field.has_custom_key())
    }

    pub fn as_field(&self) -> Option<&FieldBuilder> {
        match self {
            FieldEntry::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut FieldBuilder> {
        match self {
            FieldEntry::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Merge configuration into the entry. Opaque values are left alone.
    pub(crate) fn update_config(&mut self, modifications: Map<String, Value>) {
        match self {
            FieldEntry::Field(field) => {
                field.update_config(modifications);
            }
            FieldEntry::Raw(map) => map.extend(modifications),
            FieldEntry::Opaque(_) => {}
        }
    }

    /// Build without the final marker cleanup; used while composing a tree.
    pub(crate) fn assemble(&self) -> Value {
        match self {
            FieldEntry::Field(field) => Value::Object(field.assemble()),
            FieldEntry::Raw(map) => Value::Object(map.clone()),
            FieldEntry::Opaque(value) => value.clone(),
        }
    }
}

impl From<FieldBuilder> for FieldEntry {
    fn from(field: FieldBuilder) -> Self {
        FieldEntry::Field(field)
    }
}

impl From<Map<String, Value>> for FieldEntry {
    fn from(map: Map<String, Value>) -> Self {
        FieldEntry::Raw(map)
    }
}

impl From<Value> for FieldEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => FieldEntry::Raw(map),
            other => FieldEntry::Opaque(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn structured_field_is_named() {
        let entry = FieldEntry::from(FieldBuilder::new("title", "text"));
        assert_eq!(entry.name(), Some("title"));
        assert_eq!(entry.key().as_deref(), Some("field_title"));
    }

    #[test]
    fn raw_mapping_named_by_name_key() {
        let entry = FieldEntry::from(json!({"name": "legacy", "type": "text"}));
        assert_eq!(entry.name(), Some("legacy"));
        assert_eq!(entry.key().as_deref(), Some("field_legacy"));

        let keyed = FieldEntry::Raw(raw(json!({"name": "legacy", "key": "field_abc"})));
        assert_eq!(keyed.key().as_deref(), Some("field_abc"));
    }

    #[test]
    fn unnamed_values() {
        assert_eq!(FieldEntry::from(json!({"type": "text"})).name(), None);
        assert_eq!(FieldEntry::from(json!("separator")).name(), None);
        assert_eq!(FieldEntry::from(json!(42)).key(), None);
    }

    #[test]
    fn raw_update_merges() {
        let mut entry = FieldEntry::from(json!({"name": "legacy", "type": "text"}));
        entry.update_config(raw(json!({"type": "textarea", "rows": 4})));
        assert_eq!(entry.assemble(), json!({"name": "legacy", "type": "textarea", "rows": 4}));
    }
}
