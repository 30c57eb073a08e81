//! The root of a field group and the shape of every layout.
//!
//! A `FieldsBuilder` owns a name, a group configuration mapping and an
//! ordered, name-unique collection of fields. Building it assembles every
//! child into a plain mapping and runs the conditional and namespace passes
//! over its own fields. Groups and repeaters hold one internally for their
//! sub-fields; flexible content holds one per layout.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::condition::LocationBuilder;
use crate::context::Context;
use crate::error::Result;
use crate::logging::Pretty;
use crate::manager::FieldManager;
use crate::naming::{generate_label, group_key};
use crate::transform::{ConditionalField, NamespaceFieldKey, Pipeline, RemoveCustomKeyMarkers};
use crate::types::{FieldEntry, NamedBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldsBuilder {
    name: String,
    config: Map<String, Value>,
    fields: FieldManager,
    location: Option<LocationBuilder>,
}

impl FieldsBuilder {
    /// An empty group keyed and titled after `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut config = Map::new();
        config.insert("key".into(), Value::String(name.clone()));
        config.insert("title".into(), Value::String(generate_label(&name)));
        Self {
            name,
            config,
            fields: FieldManager::new(),
            location: None,
        }
    }

    /// An empty group whose default configuration is overridden by `config`.
    pub fn with_config(name: impl Into<String>, config: Map<String, Value>) -> Self {
        let mut builder = Self::new(name);
        builder.config.extend(config);
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_group_config(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.config.insert(key.to_string(), value.into());
        self
    }

    pub fn get_group_config(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn group_config(&self) -> &Map<String, Value> {
        &self.config
    }

    pub fn fields(&self) -> &FieldManager {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldManager {
        &mut self.fields
    }

    /// A fluent cursor positioned on this builder.
    pub fn context(&mut self) -> Context<'_> {
        Context::new(self)
    }

    /// Append a field and return its index.
    pub fn push_field(&mut self, field: impl Into<FieldEntry>) -> Result<usize> {
        let field = field.into();
        let name = field.name().map(str::to_string);
        let index = self.fields.push_field(field)?;
        debug!(builder = %self.name, field = ?name, index, "added field");
        Ok(index)
    }

    /// Append a raw configuration mapping or any other entry.
    pub fn add_entry(&mut self, entry: impl Into<FieldEntry>) -> Result<&mut Self> {
        self.push_field(entry)?;
        Ok(self)
    }

    /// Append several entries; nothing is added if any name collides.
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = FieldEntry>) -> Result<&mut Self> {
        self.fields.push_fields(entries)?;
        Ok(self)
    }

    /// Copy every field of `other` into this builder.
    pub fn add_fields(&mut self, other: &FieldsBuilder) -> Result<&mut Self> {
        debug!(builder = %self.name, from = %other.name, count = other.fields.count(), "merging fields");
        self.fields.push_fields(other.fields.iter().cloned())?;
        Ok(self)
    }

    pub fn field_exists(&self, name: &str) -> bool {
        self.fields.field_name_exists(name)
    }

    pub fn get_field(&self, name: &str) -> Result<&FieldEntry> {
        self.fields.get_field(name)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Result<&mut FieldEntry> {
        self.fields.get_field_mut(name)
    }

    pub fn remove_field(&mut self, name: &str) -> Result<FieldEntry> {
        self.fields.remove_field(name)
    }

    /// Merge configuration into the named field.
    pub fn modify_field(&mut self, name: &str, modifications: Map<String, Value>) -> Result<&mut Self> {
        self.fields.modify_field(name, modifications)?;
        Ok(self)
    }

    /// Rework the named field with a closure.
    ///
    /// The closure receives a scratch builder holding only that field and may
    /// change it, remove it or add more fields next to it. Whatever the
    /// scratch builder holds afterwards replaces the field in place.
    pub fn modify_field_with<F>(&mut self, name: &str, modify: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut FieldsBuilder) -> Result<()>,
    {
        let entry = self.fields.get_field(name)?.clone();
        let mut scratch = FieldsBuilder::new(self.name.clone());
        scratch.fields.push_field(entry)?;
        modify(&mut scratch)?;
        self.fields.replace_field(name, scratch.fields.into_entries())?;
        Ok(self)
    }

    /// Place the group with a first location clause and return the rule builder.
    pub fn set_location(
        &mut self,
        param: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut LocationBuilder {
        self.location
            .insert(LocationBuilder::new(param, operator, value))
    }

    pub fn location(&self) -> Option<&LocationBuilder> {
        self.location.as_ref()
    }

    pub fn location_mut(&mut self) -> Option<&mut LocationBuilder> {
        self.location.as_mut()
    }

    /// The finished group: `{key, title, fields, ...config}` plus `location`
    /// when one was set.
    pub fn build(&self) -> Value {
        let built = Pipeline::new()
            .then(RemoveCustomKeyMarkers)
            .run(Value::Object(self.assemble()));
        trace!("built field group '{}': {}", self.name, Pretty(&built));
        built
    }

    pub(crate) fn assemble(&self) -> Map<String, Value> {
        let mut config = self.config.clone();
        let key = config
            .get("key")
            .and_then(Value::as_str)
            .map(group_key)
            .unwrap_or_else(|| group_key(&self.name));
        config.insert("key".into(), Value::String(key));
        config.insert("fields".into(), self.assemble_fields());
        if let Some(location) = &self.location {
            config.insert("location".into(), location.build());
        }
        config
    }

    /// Every field assembled, with references resolved and keys namespaced
    /// under this builder's name.
    pub(crate) fn assemble_fields(&self) -> Value {
        let fields = Value::Array(self.fields.iter().map(FieldEntry::assemble).collect());
        Pipeline::new()
            .then(ConditionalField::new(self))
            .then(NamespaceFieldKey::new(self))
            .run(fields)
    }
}

impl NamedBuilder for FieldsBuilder {
    fn name(&self) -> &str {
        &self.name
    }
}
