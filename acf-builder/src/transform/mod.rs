//! Build-time rewrites over assembled field trees.
//!
//! Each pass is a [`Transform`] taking and returning a `serde_json::Value`.
//! A builder level composes the passes it needs into a [`Pipeline`]:
//!
//! - [`FlexibleContentLayout`] shapes one layout (`fields` to `sub_fields`)
//! - [`ConditionalField`] resolves conditional references to sibling keys
//! - [`NamespaceFieldKey`] prefixes keys with the owning builder's name
//! - [`RemoveCustomKeyMarkers`] strips internal markers from final output

mod conditional;
mod layout;
mod namespace;

pub use conditional::ConditionalField;
pub use layout::FlexibleContentLayout;
pub use namespace::NamespaceFieldKey;

use serde_json::Value;

use crate::types::{CUSTOM_COLLAPSED_MARKER, CUSTOM_KEY_MARKER};

/// A pure rewrite of an assembled tree.
pub trait Transform {
    fn transform(&self, value: Value) -> Value;
}

/// Ordered passes applied one after the other.
#[derive(Default)]
pub struct Pipeline<'a> {
    transforms: Vec<Box<dyn Transform + 'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    pub fn then(mut self, transform: impl Transform + 'a) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn run(&self, value: Value) -> Value {
        self.transforms
            .iter()
            .fold(value, |value, transform| transform.transform(value))
    }
}

/// Drop the custom-key markers everywhere in the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveCustomKeyMarkers;

impl Transform for RemoveCustomKeyMarkers {
    fn transform(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(key, _)| key != CUSTOM_KEY_MARKER && key != CUSTOM_COLLAPSED_MARKER)
                    .map(|(key, value)| (key, self.transform(value)))
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.transform(item)).collect())
            }
            other => other,
        }
    }
}
