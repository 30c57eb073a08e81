use serde_json::Value;

use super::Transform;

/// Shape an assembled layout: its `fields` become `sub_fields` and its
/// `title` becomes the `label` when no label was given and is dropped when
/// one was. Nothing below the layout's own mapping is touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleContentLayout;

impl Transform for FlexibleContentLayout {
    fn transform(&self, value: Value) -> Value {
        let Value::Object(mut layout) = value else {
            return value;
        };
        if let Some(fields) = layout.remove("fields") {
            layout.insert("sub_fields".into(), fields);
        }
        let title = layout.remove("title");
        if !layout.contains_key("label") {
            if let Some(title) = title {
                layout.insert("label".into(), title);
            }
        }
        Value::Object(layout)
    }
}
