//! Single-field builder.
//!
//! A [`FieldBuilder`] owns one field's configuration. Composite field types
//! (groups, repeaters, flexible content, choice fields) are the same builder
//! carrying a [`FieldKind`] that owns their children and folds them into the
//! built mapping.

use serde_json::{Map, Value};

use crate::choice::ChoiceFieldBuilder;
use crate::condition::ConditionalBuilder;
use crate::fields::FieldsBuilder;
use crate::flexible::FlexibleContentBuilder;
use crate::group::GroupBuilder;
use crate::naming::{generate_label, prefix_field_key};
use crate::repeater::RepeaterBuilder;
use crate::transform::{Pipeline, RemoveCustomKeyMarkers};
use crate::types::{NamedBuilder, CUSTOM_KEY_MARKER};

const CONDITIONAL_LOGIC: &str = "conditional_logic";

/// What a field owns beyond its own configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Basic,
    Tab,
    Accordion,
    Choice(ChoiceFieldBuilder),
    Group(GroupBuilder),
    Repeater(RepeaterBuilder),
    FlexibleContent(FlexibleContentBuilder),
}

/// Builds one field's configuration mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBuilder {
    name: String,
    field_type: String,
    config: Map<String, Value>,
    conditional_logic: Option<ConditionalBuilder>,
    custom_key: bool,
    explicit_key: bool,
    explicit_label: bool,
    kind: FieldKind,
}

impl FieldBuilder {
    /// A field with key `field_<name>` and a label derived from the name.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let name = name.into();
        let mut config = Map::new();
        config.insert("key".into(), Value::String(prefix_field_key(&name)));
        config.insert("name".into(), Value::String(name.clone()));
        config.insert("label".into(), Value::String(generate_label(&name)));
        Self {
            name,
            field_type: field_type.into(),
            config,
            conditional_logic: None,
            custom_key: false,
            explicit_key: false,
            explicit_label: false,
            kind: FieldKind::Basic,
        }
    }

    pub fn with_config(
        name: impl Into<String>,
        field_type: impl Into<String>,
        config: Map<String, Value>,
    ) -> Self {
        let mut field = Self::new(name, field_type);
        field.update_config(config);
        field
    }

    pub(crate) fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut FieldKind {
        &mut self.kind
    }

    pub fn get_key(&self) -> String {
        self.config
            .get("key")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| prefix_field_key(&self.name))
    }

    /// Set the key, adding the `field_` prefix when missing.
    pub fn set_key(&mut self, key: &str) -> &mut Self {
        self.config
            .insert("key".into(), Value::String(prefix_field_key(key)));
        self.custom_key = false;
        self.explicit_key = true;
        self
    }

    /// Set a key that is emitted literally and never namespaced.
    pub fn set_custom_key(&mut self, key: &str) -> &mut Self {
        self.config.insert("key".into(), Value::String(key.to_string()));
        self.custom_key = true;
        self.explicit_key = true;
        self
    }

    pub fn has_custom_key(&self) -> bool {
        self.custom_key
    }

    pub fn get_label(&self) -> String {
        self.config
            .get("label")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| generate_label(&self.name))
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.set_config("label", label.into())
    }

    /// Write one configuration value. `name` renames the field and
    /// `conditional_logic` replaces any rule builder. A `key` or `label`
    /// written here is kept across renames.
    pub fn set_config(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match key {
            "name" => {
                if let Some(name) = value.as_str() {
                    self.rename(name);
                }
            }
            "key" => self.explicit_key = true,
            "label" => self.explicit_label = true,
            CONDITIONAL_LOGIC => self.conditional_logic = None,
            _ => {}
        }
        self.config.insert(key.to_string(), value);
        self
    }

    pub fn get_config(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    pub fn update_config(&mut self, config: Map<String, Value>) -> &mut Self {
        for (key, value) in config {
            self.set_config(&key, value);
        }
        self
    }

    pub fn set_required(&mut self) -> &mut Self {
        self.set_config("required", true)
    }

    pub fn set_unrequired(&mut self) -> &mut Self {
        self.set_config("required", false)
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) -> &mut Self {
        self.set_config("instructions", instructions.into())
    }

    pub fn set_default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set_config("default_value", value)
    }

    pub fn get_wrapper(&self) -> Map<String, Value> {
        match self.config.get("wrapper") {
            Some(Value::Object(wrapper)) => wrapper.clone(),
            _ => Map::new(),
        }
    }

    pub fn set_wrapper(&mut self, wrapper: Map<String, Value>) -> &mut Self {
        self.set_config("wrapper", Value::Object(wrapper))
    }

    pub fn set_width(&mut self, width: impl Into<Value>) -> &mut Self {
        self.set_attr("width", width)
    }

    /// Set one wrapper attribute (`id`, `class`, `width`, ...).
    pub fn set_attr(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let mut wrapper = self.get_wrapper();
        wrapper.insert(name.to_string(), value.into());
        self.set_wrapper(wrapper)
    }

    /// Apply a `#id.class.class` or `.class#id` selector to the wrapper.
    /// Empty parts are skipped.
    pub fn set_selector(&mut self, css: &str) -> &mut Self {
        let (id, class) = parse_selector(css);
        if let Some(id) = id {
            self.set_attr("id", id);
        }
        if let Some(class) = class {
            self.set_attr("class", class);
        }
        self
    }

    /// Attach conditional logic and return the rule builder.
    pub fn conditional(
        &mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut ConditionalBuilder {
        self.config.remove(CONDITIONAL_LOGIC);
        self.conditional_logic
            .insert(ConditionalBuilder::new(field, operator, value))
    }

    pub fn conditional_logic(&self) -> Option<&ConditionalBuilder> {
        self.conditional_logic.as_ref()
    }

    pub fn conditional_logic_mut(&mut self) -> Option<&mut ConditionalBuilder> {
        self.conditional_logic.as_mut()
    }

    /// The nested collection of a group or repeater.
    pub fn inner_fields(&self) -> Option<&FieldsBuilder> {
        match &self.kind {
            FieldKind::Group(group) => Some(group.fields()),
            FieldKind::Repeater(repeater) => Some(repeater.fields()),
            _ => None,
        }
    }

    pub fn inner_fields_mut(&mut self) -> Option<&mut FieldsBuilder> {
        match &mut self.kind {
            FieldKind::Group(group) => Some(group.fields_mut()),
            FieldKind::Repeater(repeater) => Some(repeater.fields_mut()),
            _ => None,
        }
    }

    pub fn choices_mut(&mut self) -> Option<&mut ChoiceFieldBuilder> {
        match &mut self.kind {
            FieldKind::Choice(choices) => Some(choices),
            _ => None,
        }
    }

    pub fn as_flexible_content(&self) -> Option<&FlexibleContentBuilder> {
        match &self.kind {
            FieldKind::FlexibleContent(flexible) => Some(flexible),
            _ => None,
        }
    }

    pub fn as_flexible_content_mut(&mut self) -> Option<&mut FlexibleContentBuilder> {
        match &mut self.kind {
            FieldKind::FlexibleContent(flexible) => Some(flexible),
            _ => None,
        }
    }

    pub fn repeater_mut(&mut self) -> Option<&mut RepeaterBuilder> {
        match &mut self.kind {
            FieldKind::Repeater(repeater) => Some(repeater),
            _ => None,
        }
    }

    /// The finished field mapping.
    pub fn build(&self) -> Value {
        Pipeline::new()
            .then(RemoveCustomKeyMarkers)
            .run(Value::Object(self.assemble()))
    }

    /// `{type, ...config}` with nested builders resolved, markers kept.
    pub(crate) fn assemble(&self) -> Map<String, Value> {
        let mut config = Map::new();
        config.insert("type".into(), Value::String(self.field_type.clone()));
        config.extend(self.config.clone());
        if let Some(rules) = &self.conditional_logic {
            config.insert(CONDITIONAL_LOGIC.into(), rules.build());
        }
        if self.custom_key {
            config.insert(CUSTOM_KEY_MARKER.into(), Value::Bool(true));
        }

        match &self.kind {
            FieldKind::Choice(choices) => choices.apply(&mut config),
            FieldKind::Group(group) => group.apply(&mut config),
            FieldKind::Repeater(repeater) => repeater.apply(&mut config),
            FieldKind::FlexibleContent(flexible) => flexible.apply(self, &mut config),
            FieldKind::Basic | FieldKind::Tab | FieldKind::Accordion => {}
        }
        config
    }

    /// Derived key and label follow the new name.
    fn rename(&mut self, name: &str) {
        self.name = name.to_string();
        if !self.explicit_key {
            self.config
                .insert("key".into(), Value::String(prefix_field_key(name)));
        }
        if !self.explicit_label {
            self.config
                .insert("label".into(), Value::String(generate_label(name)));
        }
        if let Some(fields) = self.inner_fields_mut() {
            fields.rename(name);
        }
    }
}

impl NamedBuilder for FieldBuilder {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Split a mini selector into `(id, class list)`.
///
/// `#` opens an id segment and `.` opens a class segment; text before the
/// first marker is treated as a class. Classes are joined with spaces.
pub fn parse_selector(css: &str) -> (Option<String>, Option<String>) {
    let mut id = None;
    let mut classes = Vec::new();
    let mut segment = String::new();
    let mut in_id = false;

    let mut flush = |segment: &mut String, in_id: bool| {
        let part = segment.trim().to_string();
        segment.clear();
        if part.is_empty() {
            return;
        }
        if in_id {
            id = Some(part);
        } else {
            classes.push(part);
        }
    };

    for c in css.chars() {
        match c {
            '#' | '.' => {
                flush(&mut segment, in_id);
                in_id = c == '#';
            }
            _ => segment.push(c),
        }
    }
    flush(&mut segment, in_id);

    let class = (!classes.is_empty()).then(|| classes.join(" "));
    (id, class)
}
