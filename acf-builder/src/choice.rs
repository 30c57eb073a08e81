//! Choice fields: select, radio, checkbox and button group.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::context::{Context, Method};
use crate::error::Result;
use crate::field::{FieldBuilder, FieldKind};

/// Ordered `choice value => label` set. Re-adding a value replaces its
/// label and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceFieldBuilder {
    choices: IndexMap<String, Value>,
}

impl ChoiceFieldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choices(&self) -> &IndexMap<String, Value> {
        &self.choices
    }

    pub fn add_choice(&mut self, choice: impl Into<String>, label: impl Into<Value>) -> &mut Self {
        self.choices.insert(choice.into(), label.into());
        self
    }

    /// Add choices from a mapping, a list of values, or a list of
    /// single-entry mappings. A lone scalar is one choice labelled by itself.
    pub fn add_choices(&mut self, choices: impl Into<Value>) -> &mut Self {
        for (choice, label) in elaborate(choices.into()) {
            self.choices.insert(choice, label);
        }
        self
    }

    pub fn set_choices(&mut self, choices: impl Into<Value>) -> &mut Self {
        self.choices.clear();
        self.add_choices(choices)
    }

    pub(crate) fn apply(&self, config: &mut Map<String, Value>) {
        let choices = self
            .choices
            .iter()
            .map(|(choice, label)| (choice.clone(), label.clone()))
            .collect();
        config.insert("choices".into(), Value::Object(choices));
    }
}

fn elaborate(choices: Value) -> Vec<(String, Value)> {
    match choices {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .flat_map(|item| match item {
                Value::Object(map) => map.into_iter().collect::<Vec<_>>(),
                Value::Array(_) => Vec::new(),
                scalar => elaborate(scalar),
            })
            .collect(),
        Value::Null => Vec::new(),
        scalar => match scalar_key(&scalar) {
            Some(choice) => vec![(choice, scalar)],
            None => Vec::new(),
        },
    }
}

fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl FieldBuilder {
    /// A choice field. A `choices` entry in `config` seeds the choice set.
    pub fn choice(
        name: impl Into<String>,
        field_type: impl Into<String>,
        mut config: Map<String, Value>,
    ) -> Self {
        let mut choices = ChoiceFieldBuilder::new();
        if let Some(initial) = config.remove("choices") {
            choices.add_choices(initial);
        }
        FieldBuilder::with_config(name, field_type, config).with_kind(FieldKind::Choice(choices))
    }
}

impl<'a> Context<'a> {
    pub fn add_choice_field(
        self,
        name: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Result<Self> {
        self.add_field_builder(FieldBuilder::choice(name, field_type, Map::new()))
    }

    pub fn add_choice_field_with(
        self,
        name: impl Into<String>,
        field_type: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<Self> {
        self.add_field_builder(FieldBuilder::choice(name, field_type, config))
    }

    pub fn add_choice(self, choice: impl Into<String>, label: impl Into<Value>) -> Result<Self> {
        self.with_choices("add_choice", |choices| {
            choices.add_choice(choice, label);
        })
    }

    pub fn add_choices(self, choices: impl Into<Value>) -> Result<Self> {
        self.with_choices("add_choices", |builder| {
            builder.add_choices(choices);
        })
    }

    pub fn set_choices(self, choices: impl Into<Value>) -> Result<Self> {
        self.with_choices("set_choices", |builder| {
            builder.set_choices(choices);
        })
    }

    fn with_choices(
        mut self,
        call: &'static str,
        apply: impl FnOnce(&mut ChoiceFieldBuilder),
    ) -> Result<Self> {
        self.delegate(call, Method::Choices)?;
        let err = self.detached();
        let choices = self.field_mut()?.choices_mut().ok_or(err)?;
        apply(choices);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuilderError;
    use crate::fields::FieldsBuilder;
    use serde_json::json;

    fn built_choices(choices: &ChoiceFieldBuilder) -> Value {
        let mut config = Map::new();
        choices.apply(&mut config);
        config.remove("choices").unwrap_or(Value::Null)
    }

    #[test]
    fn every_input_shape_is_elaborated() {
        let mut choices = ChoiceFieldBuilder::new();
        choices
            .add_choices(json!({"red": "Red"}))
            .add_choices(json!(["green", {"blue": "Blue"}, 3]))
            .add_choices("yellow");
        assert_eq!(
            built_choices(&choices),
            json!({"red": "Red", "green": "green", "blue": "Blue", "3": 3, "yellow": "yellow"})
        );
    }

    #[test]
    fn order_is_insertion_order_and_last_write_wins() {
        let mut choices = ChoiceFieldBuilder::new();
        choices
            .add_choice("a", "A")
            .add_choice("b", "B")
            .add_choice("a", "Again");
        let order: Vec<_> = choices.choices().iter().collect();
        assert_eq!(
            order,
            vec![(&"a".to_string(), &json!("Again")), (&"b".to_string(), &json!("B"))]
        );
    }

    #[test]
    fn set_choices_replaces_everything() {
        let mut choices = ChoiceFieldBuilder::new();
        choices.add_choices(json!(["a", "b"])).set_choices(json!(["c"]));
        assert_eq!(built_choices(&choices), json!({"c": "c"}));
    }

    #[test]
    fn initial_choices_come_from_config() {
        let mut config = Map::new();
        config.insert("choices".into(), json!(["small", "large"]));
        config.insert("default_value".into(), json!("small"));
        let field = FieldBuilder::choice("size", "radio", config);
        let built = field.build();
        assert_eq!(built["choices"], json!({"small": "small", "large": "large"}));
        assert_eq!(built["default_value"], json!("small"));
    }

    #[test]
    fn choice_calls_through_the_cursor() {
        let mut builder = FieldsBuilder::new("page");
        builder
            .add_select("color")
            .unwrap()
            .add_choice("red", "Red")
            .unwrap()
            .add_choices(json!([{"blue": "Blue"}]))
            .unwrap()
            .set_required()
            .unwrap();

        let built = builder.build();
        let field = &built["fields"][0];
        assert_eq!(field["type"], json!("select"));
        assert_eq!(field["choices"], json!({"red": "Red", "blue": "Blue"}));
        assert_eq!(field["required"], json!(true));
    }

    #[test]
    fn choice_calls_outside_a_choice_field_fail() {
        let mut builder = FieldsBuilder::new("page");
        let err = builder.add_text("title").unwrap().add_choice("a", "A").unwrap_err();
        assert!(matches!(err, BuilderError::NoSuchMethod { method: "add_choice", .. }));
    }
}
