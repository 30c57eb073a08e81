//! Group fields: a named sub-collection emitted under `sub_fields`.

use serde_json::{Map, Value};

use crate::context::{Context, Method};
use crate::error::Result;
use crate::field::{FieldBuilder, FieldKind};
use crate::fields::FieldsBuilder;

/// The sub-fields of a group. They are namespaced under the group's name.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBuilder {
    fields: FieldsBuilder,
}

impl GroupBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            fields: FieldsBuilder::new(name),
        }
    }

    pub fn fields(&self) -> &FieldsBuilder {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldsBuilder {
        &mut self.fields
    }

    pub(crate) fn apply(&self, config: &mut Map<String, Value>) {
        config.remove("fields");
        config.insert("sub_fields".into(), self.fields.assemble_fields());
    }
}

impl FieldBuilder {
    pub fn group(name: impl Into<String>, config: Map<String, Value>) -> Self {
        let name = name.into();
        let mut field = FieldBuilder::new(name.clone(), "group")
            .with_kind(FieldKind::Group(GroupBuilder::new(name)));
        field.update_config(config);
        field
    }
}

impl<'a> Context<'a> {
    /// Add a group and move into it; fields added next land inside it.
    pub fn add_group(self, name: impl Into<String>) -> Result<Self> {
        self.add_field_builder(FieldBuilder::group(name, Map::new()))
    }

    pub fn add_group_with(self, name: impl Into<String>, config: Map<String, Value>) -> Result<Self> {
        self.add_field_builder(FieldBuilder::group(name, config))
    }

    /// Leave the enclosing group, returning to the collection that holds it.
    pub fn end_group(self) -> Result<Self> {
        self.end("end_group", Method::EndGroup)
    }
}

impl FieldsBuilder {
    pub fn add_group(&mut self, name: impl Into<String>) -> Result<Context<'_>> {
        self.context().add_group(name)
    }

    pub fn add_group_with(
        &mut self,
        name: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<Context<'_>> {
        self.context().add_group_with(name, config)
    }
}
