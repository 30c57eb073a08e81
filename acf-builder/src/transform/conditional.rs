use serde_json::{Map, Value};
use tracing::debug;

use super::Transform;
use crate::fields::FieldsBuilder;
use crate::naming::prefix_field_key;
use crate::types::{CUSTOM_KEY_MARKER, MISSING_FIELD_MARKER};

/// Resolve conditional clauses that name sibling fields into their keys.
///
/// Clauses on this builder's own fields are looked up among its fields.
/// Clauses deeper in the tree that an inner builder could not resolve
/// carry [`MISSING_FIELD_MARKER`] and get another try here, so a field
/// inside a group can depend on a field beside the group.
pub struct ConditionalField<'a> {
    builder: &'a FieldsBuilder,
}

impl<'a> ConditionalField<'a> {
    pub fn new(builder: &'a FieldsBuilder) -> Self {
        Self { builder }
    }

    fn walk(&self, value: Value, own_level: bool) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.walk(item, own_level))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(self.walk_field(map, own_level)),
            other => other,
        }
    }

    fn walk_field(&self, map: Map<String, Value>, own_level: bool) -> Map<String, Value> {
        map.into_iter()
            .map(|(key, value)| {
                let value = match key.as_str() {
                    "conditional_logic" => self.resolve_logic(value, own_level),
                    "choices" => value,
                    _ => self.walk(value, false),
                };
                (key, value)
            })
            .collect()
    }

    fn resolve_logic(&self, logic: Value, own_level: bool) -> Value {
        let Value::Array(groups) = logic else {
            return logic;
        };
        Value::Array(
            groups
                .into_iter()
                .map(|group| match group {
                    Value::Array(clauses) => Value::Array(
                        clauses
                            .into_iter()
                            .map(|clause| match clause {
                                Value::Object(clause) => {
                                    Value::Object(self.resolve_clause(clause, own_level))
                                }
                                other => other,
                            })
                            .collect(),
                    ),
                    other => other,
                })
                .collect(),
        )
    }

    fn resolve_clause(&self, mut clause: Map<String, Value>, own_level: bool) -> Map<String, Value> {
        let retry = clause.contains_key(MISSING_FIELD_MARKER);
        if !own_level && !retry {
            return clause;
        }
        let Some(name) = clause
            .get(MISSING_FIELD_MARKER)
            .or_else(|| clause.get("field"))
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            return clause;
        };

        match self.builder.fields().get_field(&name) {
            Ok(sibling) => {
                clause.remove(MISSING_FIELD_MARKER);
                let key = sibling
                    .key()
                    .unwrap_or_else(|| prefix_field_key(&name));
                clause.insert("field".into(), Value::String(key));
                if sibling.has_custom_key() {
                    clause.insert(CUSTOM_KEY_MARKER.into(), Value::Bool(true));
                }
                if retry {
                    debug!(field = %name, builder = self.builder.name(), "resolved conditional reference from an enclosing builder");
                }
            }
            Err(_) if !retry => {
                debug!(field = %name, builder = self.builder.name(), "conditional references a field that does not exist");
                clause.insert(MISSING_FIELD_MARKER.into(), Value::String(name));
            }
            Err(_) => {}
        }
        clause
    }
}

impl Transform for ConditionalField<'_> {
    fn transform(&self, value: Value) -> Value {
        self.walk(value, true)
    }
}
