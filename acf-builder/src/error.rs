//! Error types for the field group builder

use thiserror::Error;

/// Result type for builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Errors that can occur while assembling a field group
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A field with this name already exists in the receiving collection
    #[error("duplicate field name: {name}")]
    NameCollision { name: String },

    /// No field with this name exists in the collection
    #[error("field not found: {name}")]
    FieldNotFound { name: String },

    /// `pop_field` on a collection with no entries
    #[error("cannot pop a field from an empty collection")]
    EmptyCollection,

    /// No builder between the current context and the root implements the call
    #[error("no builder in the chain from '{context}' implements '{method}'")]
    NoSuchMethod {
        method: &'static str,
        context: String,
    },

    /// A context path that no longer points at a builder
    #[error("context path does not resolve to a builder: {path}")]
    DetachedContext { path: String },
}
