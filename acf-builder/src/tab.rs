//! Tabs, accordions and messages: presentational fields named after their label.

use serde_json::Value;

use crate::context::{Context, Method};
use crate::error::Result;
use crate::field::{FieldBuilder, FieldKind};
use crate::fields::FieldsBuilder;
use crate::naming::generate_name;

impl FieldBuilder {
    /// A tab named `<label>_tab`.
    pub fn tab(label: impl Into<String>) -> Self {
        Self::labelled(label.into(), "tab").with_kind(FieldKind::Tab)
    }

    /// An accordion named `<label>_accordion`.
    pub fn accordion(label: impl Into<String>) -> Self {
        Self::labelled(label.into(), "accordion").with_kind(FieldKind::Accordion)
    }

    /// A message field named `<label>_message` showing `message`.
    pub fn message(label: impl Into<String>, message: impl Into<String>) -> Self {
        let mut field = Self::labelled(label.into(), "message");
        field.set_config("message", message.into());
        field
    }

    /// Close the current run of tabs or accordions.
    pub fn endpoint(&mut self) -> &mut Self {
        self.set_config("endpoint", true)
    }

    fn labelled(label: String, field_type: &str) -> Self {
        let name = format!("{}_{field_type}", generate_name(&label));
        let mut field = FieldBuilder::new(name, field_type);
        field.set_label(label);
        field
    }
}

impl<'a> Context<'a> {
    pub fn add_tab(self, label: impl Into<String>) -> Result<Self> {
        self.add_field_builder(FieldBuilder::tab(label))
    }

    pub fn add_accordion(self, label: impl Into<String>) -> Result<Self> {
        self.add_field_builder(FieldBuilder::accordion(label))
    }

    pub fn add_message(self, label: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        self.add_field_builder(FieldBuilder::message(label, message))
    }

    pub fn endpoint(mut self) -> Result<Self> {
        self.delegate("endpoint", Method::Endpoint)?;
        self.field_mut()?.endpoint();
        Ok(self)
    }

    /// Set the tab placement (`top` or `left`).
    pub fn set_placement(self, placement: impl Into<Value>) -> Result<Self> {
        self.set_config("placement", placement)
    }
}

impl FieldsBuilder {
    pub fn add_tab(&mut self, label: impl Into<String>) -> Result<Context<'_>> {
        self.context().add_tab(label)
    }

    pub fn add_accordion(&mut self, label: impl Into<String>) -> Result<Context<'_>> {
        self.context().add_accordion(label)
    }

    pub fn add_message(
        &mut self,
        label: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Context<'_>> {
        self.context().add_message(label, message)
    }
}
