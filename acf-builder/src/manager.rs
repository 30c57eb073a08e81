//! Ordered, name-unique field collection.
//!
//! Every mutating operation validates names eagerly: an insertion that
//! would produce two entries with the same name fails before the
//! collection changes. Lookups by name all route through
//! [`FieldManager::get_field_index`].

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{BuilderError, Result};
use crate::types::FieldEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldManager {
    fields: Vec<FieldEntry>,
}

impl FieldManager {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Seed a collection, failing on the first duplicate name.
    pub fn with_fields(fields: impl IntoIterator<Item = FieldEntry>) -> Result<Self> {
        let mut manager = Self::new();
        manager.push_fields(fields)?;
        Ok(manager)
    }

    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.fields.iter()
    }

    pub fn count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_entries(self) -> Vec<FieldEntry> {
        self.fields
    }

    /// Append one entry and return its index.
    pub fn push_field(&mut self, field: impl Into<FieldEntry>) -> Result<usize> {
        let field = field.into();
        self.validate_field(&field)?;
        self.fields.push(field);
        Ok(self.fields.len() - 1)
    }

    /// Append several entries; nothing is appended if any name collides.
    pub fn push_fields(&mut self, fields: impl IntoIterator<Item = FieldEntry>) -> Result<()> {
        let index = self.fields.len();
        self.insert_fields(fields, index)
    }

    /// Remove and return the last entry.
    pub fn pop_field(&mut self) -> Result<FieldEntry> {
        self.fields.pop().ok_or(BuilderError::EmptyCollection)
    }

    /// Insert entries at `index` (clamped to the end); nothing is inserted
    /// if any name collides with the collection or with another new entry.
    pub fn insert_fields(
        &mut self,
        fields: impl IntoIterator<Item = FieldEntry>,
        index: usize,
    ) -> Result<()> {
        let fields: Vec<FieldEntry> = fields.into_iter().collect();
        let mut incoming = HashSet::new();
        for field in &fields {
            self.validate_field(field)?;
            if let Some(name) = field.name() {
                if !incoming.insert(name) {
                    return Err(BuilderError::NameCollision {
                        name: name.to_string(),
                    });
                }
            }
        }

        let index = index.min(self.fields.len());
        let tail = self.fields.split_off(index);
        self.fields.extend(fields);
        self.fields.extend(tail);
        Ok(())
    }

    pub fn remove_field_at_index(&mut self, index: usize) -> Option<FieldEntry> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    pub fn remove_field(&mut self, name: &str) -> Result<FieldEntry> {
        let index = self.get_field_index(name)?;
        debug!(field = name, index, "removed field");
        Ok(self.fields.remove(index))
    }

    /// Swap the named entry for zero or more entries at the same position.
    /// On a collision the original entry is put back.
    pub fn replace_field(
        &mut self,
        name: &str,
        fields: impl IntoIterator<Item = FieldEntry>,
    ) -> Result<()> {
        let index = self.get_field_index(name)?;
        let original = self.fields.remove(index);
        if let Err(err) = self.insert_fields(fields, index) {
            self.fields.insert(index, original);
            return Err(err);
        }
        Ok(())
    }

    /// Merge configuration into the named entry. A `name` in the
    /// modifications renames the entry and must not collide.
    pub fn modify_field(&mut self, name: &str, modifications: Map<String, Value>) -> Result<()> {
        let index = self.get_field_index(name)?;
        if let Some(new_name) = modifications.get("name").and_then(Value::as_str) {
            if new_name != name && self.field_name_exists(new_name) {
                return Err(BuilderError::NameCollision {
                    name: new_name.to_string(),
                });
            }
        }
        self.fields[index].update_config(modifications);
        Ok(())
    }

    pub fn field_name_exists(&self, name: &str) -> bool {
        self.get_field_index(name).is_ok()
    }

    pub fn get_field(&self, name: &str) -> Result<&FieldEntry> {
        let index = self.get_field_index(name)?;
        Ok(&self.fields[index])
    }

    pub fn get_field_mut(&mut self, name: &str) -> Result<&mut FieldEntry> {
        let index = self.get_field_index(name)?;
        Ok(&mut self.fields[index])
    }

    /// Position of the named entry. Unnamed entries never match.
    pub fn get_field_index(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|field| field.name() == Some(name))
            .ok_or_else(|| BuilderError::FieldNotFound {
                name: name.to_string(),
            })
    }

    pub(crate) fn entry(&self, index: usize) -> Option<&FieldEntry> {
        self.fields.get(index)
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut FieldEntry> {
        self.fields.get_mut(index)
    }

    fn validate_field(&self, field: &FieldEntry) -> Result<()> {
        match field.name() {
            Some(name) if self.field_name_exists(name) => Err(BuilderError::NameCollision {
                name: name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a FieldManager {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldBuilder;
    use serde_json::json;

    fn text(name: &str) -> FieldEntry {
        FieldBuilder::new(name, "text").into()
    }

    fn names(manager: &FieldManager) -> Vec<Option<&str>> {
        manager.iter().map(FieldEntry::name).collect()
    }

    #[test]
    fn push_rejects_duplicate_names() {
        let mut manager = FieldManager::new();
        manager.push_field(text("content")).unwrap();
        let err = manager.push_field(text("content")).unwrap_err();
        assert_eq!(
            err,
            BuilderError::NameCollision {
                name: "content".into()
            }
        );
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn raw_mapping_names_collide_with_builders() {
        let mut manager = FieldManager::new();
        manager.push_field(text("content")).unwrap();
        let err = manager
            .push_field(json!({"name": "content", "type": "textarea"}))
            .unwrap_err();
        assert!(matches!(err, BuilderError::NameCollision { .. }));
    }

    #[test]
    fn unnamed_entries_skip_collision_checks() {
        let mut manager = FieldManager::new();
        manager.push_field(json!("separator")).unwrap();
        manager.push_field(json!("separator")).unwrap();
        manager.push_field(json!({"type": "message"})).unwrap();
        manager.push_field(json!({"type": "message"})).unwrap();
        assert_eq!(manager.count(), 4);
    }

    #[test]
    fn push_fields_is_all_or_nothing() {
        let mut manager = FieldManager::with_fields([text("a")]).unwrap();
        let err = manager
            .push_fields([text("b"), text("c"), text("b")])
            .unwrap_err();
        assert_eq!(err, BuilderError::NameCollision { name: "b".into() });
        assert_eq!(names(&manager), vec![Some("a")]);
    }

    #[test]
    fn pop_empty_collection_fails() {
        let mut manager = FieldManager::new();
        assert_eq!(manager.pop_field().unwrap_err(), BuilderError::EmptyCollection);
    }

    #[test]
    fn pop_then_push_restores_sequence() {
        let mut manager = FieldManager::with_fields([text("title")]).unwrap();
        let before = manager.clone();
        let entry = manager.pop_field().unwrap();
        assert!(manager.is_empty());
        manager.push_field(entry).unwrap();
        assert_eq!(manager, before);
    }

    #[test]
    fn insert_at_position() {
        let mut manager = FieldManager::with_fields([text("a"), text("d")]).unwrap();
        manager.insert_fields([text("b"), text("c")], 1).unwrap();
        assert_eq!(names(&manager), vec![Some("a"), Some("b"), Some("c"), Some("d")]);

        manager.insert_fields([text("e")], 99).unwrap();
        assert_eq!(manager.get_field_index("e").unwrap(), 4);
    }

    #[test]
    fn remove_and_replace_by_name() {
        let mut manager = FieldManager::with_fields([text("a"), text("b"), text("c")]).unwrap();
        let removed = manager.remove_field("b").unwrap();
        assert_eq!(removed.name(), Some("b"));
        assert_eq!(names(&manager), vec![Some("a"), Some("c")]);

        manager.replace_field("a", [text("x"), text("y")]).unwrap();
        assert_eq!(names(&manager), vec![Some("x"), Some("y"), Some("c")]);
    }

    #[test]
    fn missing_names_are_not_found() {
        let mut manager = FieldManager::with_fields([text("a")]).unwrap();
        let not_found = BuilderError::FieldNotFound {
            name: "missing".into(),
        };
        assert_eq!(manager.remove_field("missing").unwrap_err(), not_found);
        assert_eq!(manager.replace_field("missing", []).unwrap_err(), not_found);
        assert_eq!(manager.get_field("missing").unwrap_err(), not_found);
        assert_eq!(manager.get_field_index("missing").unwrap_err(), not_found);
        assert!(!manager.field_name_exists("missing"));
    }

    #[test]
    fn failed_replace_restores_original() {
        let mut manager = FieldManager::with_fields([text("a"), text("b")]).unwrap();
        let before = manager.clone();
        let err = manager.replace_field("a", [text("b")]).unwrap_err();
        assert_eq!(err, BuilderError::NameCollision { name: "b".into() });
        assert_eq!(manager, before);
    }

    #[test]
    fn replace_with_own_name_is_allowed() {
        let mut manager = FieldManager::with_fields([text("a")]).unwrap();
        manager
            .replace_field("a", [FieldBuilder::new("a", "textarea").into()])
            .unwrap();
        let field = manager.get_field("a").unwrap().as_field().unwrap();
        assert_eq!(field.field_type(), "textarea");
    }

    #[test]
    fn modify_merges_and_checks_renames() {
        let mut manager = FieldManager::with_fields([text("a"), text("b")]).unwrap();
        let mut modifications = Map::new();
        modifications.insert("instructions".into(), json!("Shown under the input"));
        manager.modify_field("a", modifications).unwrap();
        let field = manager.get_field("a").unwrap().as_field().unwrap();
        assert_eq!(
            field.get_config("instructions"),
            Some(&json!("Shown under the input"))
        );

        let mut rename = Map::new();
        rename.insert("name".into(), json!("b"));
        assert!(matches!(
            manager.modify_field("a", rename).unwrap_err(),
            BuilderError::NameCollision { .. }
        ));
    }
}
