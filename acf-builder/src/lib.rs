//! Fluent builder for custom-field group definitions
//!
//! `acf-builder` assembles the nested configuration a custom-fields plugin
//! reads to render its edit screens: a field group with its fields, groups,
//! repeaters, flexible content layouts, conditional logic and location rules.
//! The output is a plain `serde_json::Value` with no ties back to the builders.
//!
//! # Architecture
//!
//! - **Owned tree**: a [`FieldsBuilder`] owns its fields; composite fields own
//!   their sub-fields and layouts. Nothing points back up the tree.
//! - **Cursor chains**: [`Context`] walks the tree by path, so a chain can step
//!   into a repeater, add rows and fall back out to call root-level methods.
//! - **Eager collisions**: every insertion checks names in the receiving
//!   collection and fails with [`BuilderError::NameCollision`] immediately.
//! - **Build passes**: keys and conditional references are rewritten at
//!   build time by the [`transform`] passes, one builder level at a time.

pub mod choice;
pub mod condition;
pub mod context;
pub mod error;
pub mod field;
pub mod fields;
pub mod flexible;
pub mod group;
pub mod logging;
pub mod manager;
pub mod naming;
pub mod repeater;
pub mod tab;
pub mod transform;
pub mod types;

pub use choice::ChoiceFieldBuilder;
pub use condition::{Clause, ConditionalBuilder, LocationBuilder, RuleBuilder};
pub use context::{Context, ContextKind, Method, Step};
pub use error::{BuilderError, Result};
pub use field::{FieldBuilder, FieldKind};
pub use fields::FieldsBuilder;
pub use flexible::FlexibleContentBuilder;
pub use group::GroupBuilder;
pub use logging::Pretty;
pub use manager::FieldManager;
pub use repeater::RepeaterBuilder;
pub use types::{FieldEntry, NamedBuilder};
