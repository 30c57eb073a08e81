use serde_json::{Map, Value};

use super::Transform;
use crate::naming::namespaced_key;
use crate::types::{NamedBuilder, CUSTOM_COLLAPSED_MARKER, CUSTOM_KEY_MARKER, MISSING_FIELD_MARKER};

/// Values under these keys are field keys or references to them.
const NAMESPACED_KEYS: [&str; 3] = ["key", "field", "collapsed"];

/// Prefix every key and field reference in the tree with the builder's name.
///
/// Runs once per builder level, so a key nested three builders deep ends up
/// carrying all three names. Custom keys and unresolved references are
/// flagged by markers and left as they are; choice sets are never entered.
pub struct NamespaceFieldKey<'a> {
    builder: &'a dyn NamedBuilder,
}

impl<'a> NamespaceFieldKey<'a> {
    pub fn new(builder: &'a dyn NamedBuilder) -> Self {
        Self { builder }
    }

    fn rewrite(&self, map: Map<String, Value>) -> Map<String, Value> {
        let custom_key = map.contains_key(CUSTOM_KEY_MARKER);
        let custom_collapsed = map.contains_key(CUSTOM_COLLAPSED_MARKER);
        let missing = map.contains_key(MISSING_FIELD_MARKER);

        map.into_iter()
            .map(|(key, value)| {
                let frozen = match key.as_str() {
                    "key" => custom_key,
                    "field" => custom_key || missing,
                    "collapsed" => custom_collapsed,
                    _ => false,
                };
                let value = match value {
                    Value::String(s) if NAMESPACED_KEYS.contains(&key.as_str()) && !frozen => {
                        Value::String(namespaced_key(self.builder.name(), &s))
                    }
                    value if key == "choices" => value,
                    value => self.transform(value),
                };
                (key, value)
            })
            .collect()
    }
}

impl Transform for NamespaceFieldKey<'_> {
    fn transform(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.rewrite(map)),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.transform(item)).collect())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Named(&'static str);

    impl NamedBuilder for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn namespace(name: &'static str, value: Value) -> Value {
        NamespaceFieldKey::new(&Named(name)).transform(value)
    }

    #[test]
    fn keys_and_references_are_prefixed() {
        let fields = json!([
            {"key": "field_title", "name": "title"},
            {
                "key": "field_subtitle",
                "name": "subtitle",
                "conditional_logic": [[{"field": "field_title", "operator": "!=", "value": "field_x"}]]
            }
        ]);
        assert_eq!(
            namespace("Page Banner", fields),
            json!([
                {"key": "field_page_banner_title", "name": "title"},
                {
                    "key": "field_page_banner_subtitle",
                    "name": "subtitle",
                    "conditional_logic": [[{"field": "field_page_banner_title", "operator": "!=", "value": "field_x"}]]
                }
            ])
        );
    }

    #[test]
    fn nested_levels_compose() {
        let inner = namespace("slides", json!([{"key": "field_title"}]));
        let outer = namespace("banner", json!([{"key": "field_slides", "sub_fields": inner}]));
        assert_eq!(
            outer,
            json!([{"key": "field_banner_slides", "sub_fields": [{"key": "field_banner_slides_title"}]}])
        );
    }

    #[test]
    fn markers_freeze_values() {
        let fields = json!([
            {"key": "my_key", "_has_custom_key": true, "collapsed": "field_rows_title"},
            {"conditional_logic": [[
                {"field": "my_key", "_has_custom_key": true},
                {"field": "ghost", "_field_does_not_exist": "ghost"}
            ]]},
            {"collapsed": "literal", "_has_custom_collapsed": true}
        ]);
        assert_eq!(
            namespace("page", fields),
            json!([
                {"key": "my_key", "_has_custom_key": true, "collapsed": "field_page_rows_title"},
                {"conditional_logic": [[
                    {"field": "my_key", "_has_custom_key": true},
                    {"field": "ghost", "_field_does_not_exist": "ghost"}
                ]]},
                {"collapsed": "literal", "_has_custom_collapsed": true}
            ])
        );
    }

    #[test]
    fn choices_and_non_strings_are_untouched() {
        let field = json!({"key": 5, "choices": {"key": "Key", "field": "Field"}});
        assert_eq!(namespace("page", field.clone()), field);
    }

    #[test]
    fn unnamed_builder_only_reprefixes() {
        assert_eq!(
            namespace("", json!({"key": "group_banner"})),
            json!({"key": "field_banner"})
        );
    }
}
