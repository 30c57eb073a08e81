//! Repeater fields.

use serde_json::{Map, Value};
use tracing::debug;

use crate::context::{Context, Method};
use crate::error::Result;
use crate::field::{FieldBuilder, FieldKind};
use crate::fields::FieldsBuilder;
use crate::naming::namespaced_key;
use crate::types::CUSTOM_COLLAPSED_MARKER;

/// The row fields of a repeater plus the sub-field shown when a row is
/// collapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeaterBuilder {
    fields: FieldsBuilder,
    collapsed: Option<String>,
}

impl RepeaterBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            fields: FieldsBuilder::new(name),
            collapsed: None,
        }
    }

    pub fn fields(&self) -> &FieldsBuilder {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldsBuilder {
        &mut self.fields
    }

    /// Name of the sub-field shown on collapsed rows.
    pub fn set_collapsed(&mut self, name: impl Into<String>) -> &mut Self {
        self.collapsed = Some(name.into());
        self
    }

    pub fn collapsed(&self) -> Option<&str> {
        self.collapsed.as_deref()
    }

    pub(crate) fn apply(&self, config: &mut Map<String, Value>) {
        config.remove("fields");
        config.insert("sub_fields".into(), self.fields.assemble_fields());

        let Some(name) = &self.collapsed else {
            return;
        };
        let collapsed = match self.fields.get_field(name) {
            Ok(sub_field) if sub_field.has_custom_key() => {
                config.insert(CUSTOM_COLLAPSED_MARKER.into(), Value::Bool(true));
                sub_field.key()
            }
            Ok(sub_field) => sub_field
                .key()
                .map(|key| namespaced_key(self.fields.name(), &key)),
            Err(_) => {
                debug!(repeater = self.fields.name(), field = %name, "collapsed field is not a sub-field");
                None
            }
        };
        config.insert(
            "collapsed".into(),
            Value::String(collapsed.unwrap_or_else(|| name.clone())),
        );
    }
}

impl FieldBuilder {
    pub fn repeater(name: impl Into<String>, config: Map<String, Value>) -> Self {
        let name = name.into();
        let mut field = FieldBuilder::new(name.clone(), "repeater")
            .with_kind(FieldKind::Repeater(RepeaterBuilder::new(name)));
        field.update_config(config);
        field
    }
}

impl<'a> Context<'a> {
    /// Add a repeater and move into it; fields added next become its rows.
    pub fn add_repeater(self, name: impl Into<String>) -> Result<Self> {
        self.add_field_builder(FieldBuilder::repeater(name, Map::new()))
    }

    pub fn add_repeater_with(
        self,
        name: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<Self> {
        self.add_field_builder(FieldBuilder::repeater(name, config))
    }

    pub fn set_collapsed(mut self, name: impl Into<String>) -> Result<Self> {
        self.delegate("set_collapsed", Method::Collapsed)?;
        let err = self.detached();
        self.field_mut()?
            .repeater_mut()
            .ok_or(err)?
            .set_collapsed(name);
        Ok(self)
    }

    /// Leave the enclosing repeater, returning to the collection that holds it.
    pub fn end_repeater(self) -> Result<Self> {
        self.end("end_repeater", Method::EndRepeater)
    }
}

impl FieldsBuilder {
    pub fn add_repeater(&mut self, name: impl Into<String>) -> Result<Context<'_>> {
        self.context().add_repeater(name)
    }

    pub fn add_repeater_with(
        &mut self,
        name: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<Context<'_>> {
        self.context().add_repeater_with(name, config)
    }
}
