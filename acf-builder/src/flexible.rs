//! Flexible content fields and their layouts.
//!
//! Each layout is a [`FieldsBuilder`] of its own. Building a flexible content
//! field assembles every layout, reshapes it into a layout mapping and then
//! namespaces it under the field's name, so a layout `banner` inside field
//! `sections` is keyed `field_sections_banner` and its `title` sub-field
//! `field_sections_banner_title`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::context::{Context, Method, Step};
use crate::error::{BuilderError, Result};
use crate::field::{FieldBuilder, FieldKind};
use crate::fields::FieldsBuilder;
use crate::naming::singularize;
use crate::transform::{FlexibleContentLayout, NamespaceFieldKey, Pipeline};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlexibleContentBuilder {
    layouts: Vec<FieldsBuilder>,
}

impl FlexibleContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layouts(&self) -> &[FieldsBuilder] {
        &self.layouts
    }

    pub fn layouts_mut(&mut self) -> &mut [FieldsBuilder] {
        &mut self.layouts
    }

    pub fn layout_exists(&self, name: &str) -> bool {
        self.layout_index(name).is_some()
    }

    pub fn layout_index(&self, name: &str) -> Option<usize> {
        self.layouts.iter().position(|layout| layout.name() == name)
    }

    pub fn get_layout(&self, name: &str) -> Result<&FieldsBuilder> {
        self.layout_index(name)
            .map(|index| &self.layouts[index])
            .ok_or_else(|| BuilderError::FieldNotFound {
                name: name.to_string(),
            })
    }

    pub fn add_layout(&mut self, name: impl Into<String>) -> Result<&mut FieldsBuilder> {
        self.add_layout_with(name, Map::new())
    }

    /// Add an empty layout. `config` overrides the layout defaults
    /// (`name`, `display: block`, `title`).
    pub fn add_layout_with(
        &mut self,
        name: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<&mut FieldsBuilder> {
        let index = self.push_layout(FieldsBuilder::with_config(name, config))?;
        Ok(&mut self.layouts[index])
    }

    /// Add a layout built on its own and return its index. It gets a `name`
    /// and `display: block` unless its group config already sets them.
    pub fn push_layout(&mut self, mut layout: FieldsBuilder) -> Result<usize> {
        if self.layout_exists(layout.name()) {
            return Err(BuilderError::NameCollision {
                name: layout.name().to_string(),
            });
        }
        if layout.get_group_config("name").is_none() {
            let name = layout.name().to_string();
            layout.set_group_config("name", name);
        }
        if layout.get_group_config("display").is_none() {
            layout.set_group_config("display", "block");
        }
        debug!(layout = layout.name(), fields = layout.fields().count(), "added layout");
        self.layouts.push(layout);
        Ok(self.layouts.len() - 1)
    }

    pub(crate) fn apply(&self, field: &FieldBuilder, config: &mut Map<String, Value>) {
        if !config.contains_key("button") {
            let button = format!("Add {}", singularize(&field.get_label()));
            config.insert("button".into(), Value::String(button));
        }

        let pipeline = Pipeline::new()
            .then(FlexibleContentLayout)
            .then(NamespaceFieldKey::new(field));
        let layouts = self
            .layouts
            .iter()
            .map(|layout| pipeline.run(Value::Object(layout.assemble())))
            .collect();
        config.insert("layouts".into(), Value::Array(layouts));
    }
}

impl FieldBuilder {
    pub fn flexible_content(name: impl Into<String>, config: Map<String, Value>) -> Self {
        let mut field = FieldBuilder::new(name, "flexible_content")
            .with_kind(FieldKind::FlexibleContent(FlexibleContentBuilder::new()));
        field.update_config(config);
        field
    }
}

impl<'a> Context<'a> {
    /// Add a flexible content field and move onto it.
    pub fn add_flexible_content(self, name: impl Into<String>) -> Result<Self> {
        self.add_field_builder(FieldBuilder::flexible_content(name, Map::new()))
    }

    pub fn add_flexible_content_with(
        self,
        name: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<Self> {
        self.add_field_builder(FieldBuilder::flexible_content(name, config))
    }

    /// Add a layout to the enclosing flexible content field and move into it.
    pub fn add_layout(self, name: impl Into<String>) -> Result<Self> {
        self.add_layout_with(name, Map::new())
    }

    pub fn add_layout_with(self, name: impl Into<String>, config: Map<String, Value>) -> Result<Self> {
        self.add_layout_builder(FieldsBuilder::with_config(name, config))
    }

    /// Add an independently built layout and move into it.
    pub fn add_layout_builder(mut self, layout: FieldsBuilder) -> Result<Self> {
        let index = self.push_layout("add_layout", layout)?;
        self.enter(Step::Layout(index));
        Ok(self)
    }

    /// Add several layouts; the cursor stays on the flexible content field.
    pub fn add_layouts(mut self, layouts: impl IntoIterator<Item = FieldsBuilder>) -> Result<Self> {
        for layout in layouts {
            self.push_layout("add_layouts", layout)?;
        }
        Ok(self)
    }

    /// Leave the enclosing flexible content field.
    pub fn end_flexible_content(self) -> Result<Self> {
        self.end("end_flexible_content", Method::EndFlexibleContent)
    }

    fn push_layout(&mut self, call: &'static str, layout: FieldsBuilder) -> Result<usize> {
        self.delegate(call, Method::Layouts)?;
        let err = self.detached();
        self.field_mut()?
            .as_flexible_content_mut()
            .ok_or(err)?
            .push_layout(layout)
    }
}

impl FieldsBuilder {
    pub fn add_flexible_content(&mut self, name: impl Into<String>) -> Result<Context<'_>> {
        self.context().add_flexible_content(name)
    }

    pub fn add_flexible_content_with(
        &mut self,
        name: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<Context<'_>> {
        self.context().add_flexible_content_with(name, config)
    }
}
