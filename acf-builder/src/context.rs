//! Fluent cursor over a builder tree.
//!
//! A [`Context`] holds the exclusive borrow of a root [`FieldsBuilder`] and
//! the path of [`Step`]s leading from the root to the builder the chain is
//! currently on. Every fluent call names the [`Method`] group it belongs to;
//! when the current builder does not implement it, the cursor walks up the
//! path to the nearest ancestor that does and continues from there. Running
//! out of ancestors is [`BuilderError::NoSuchMethod`].
//!
//! ```
//! use acf_builder::FieldsBuilder;
//!
//! let mut banner = FieldsBuilder::new("banner");
//! banner
//!     .add_text("title")?
//!     .set_required()?
//!     .add_repeater("slides")?
//!     .add_image("image")?
//!     .end_repeater()?
//!     .set_location("post_type", "==", "page")?;
//!
//! let built = banner.build();
//! assert_eq!(built["fields"][1]["sub_fields"][0]["key"], "field_banner_slides_image");
//! # Ok::<(), acf_builder::BuilderError>(())
//! ```

use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::condition::{ConditionalBuilder, LocationBuilder};
use crate::error::{BuilderError, Result};
use crate::field::{FieldBuilder, FieldKind};
use crate::fields::FieldsBuilder;
use crate::types::FieldEntry;

/// One hop from a builder to a builder it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A field of the collection owned by the current builder.
    Field(usize),
    /// A layout of the current flexible content field.
    Layout(usize),
    /// The conditional logic of the current field.
    Conditional,
    /// The location rules of the root.
    Location,
}

/// What kind of builder the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Fields,
    Layout,
    Field,
    Choice,
    Tab,
    Accordion,
    Group,
    Repeater,
    FlexibleContent,
    Conditional,
    Location,
}

impl ContextKind {
    fn is_field(self) -> bool {
        matches!(
            self,
            ContextKind::Field
                | ContextKind::Choice
                | ContextKind::Tab
                | ContextKind::Accordion
                | ContextKind::Group
                | ContextKind::Repeater
                | ContextKind::FlexibleContent
        )
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContextKind::Fields => "fields",
            ContextKind::Layout => "layout",
            ContextKind::Field => "field",
            ContextKind::Choice => "choice field",
            ContextKind::Tab => "tab",
            ContextKind::Accordion => "accordion",
            ContextKind::Group => "group",
            ContextKind::Repeater => "repeater",
            ContextKind::FlexibleContent => "flexible content",
            ContextKind::Conditional => "conditional",
            ContextKind::Location => "location",
        };
        f.write_str(name)
    }
}

/// Groups of fluent calls sharing one set of implementing builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Adding, removing and inspecting fields.
    Collection,
    SetLocation,
    GroupConfig,
    /// `and` / `or` on a rule builder.
    Rule,
    FieldConfig,
    Conditional,
    Choices,
    Collapsed,
    EndGroup,
    EndRepeater,
    Layouts,
    EndFlexibleContent,
    Endpoint,
}

impl Method {
    /// The forwarding table: which builders answer this call themselves.
    pub fn implemented_by(self, kind: ContextKind) -> bool {
        use ContextKind as K;
        match self {
            Method::Collection => {
                matches!(kind, K::Fields | K::Layout | K::Group | K::Repeater)
            }
            Method::SetLocation => kind == K::Fields,
            Method::GroupConfig => matches!(kind, K::Fields | K::Layout),
            Method::Rule => matches!(kind, K::Conditional | K::Location),
            Method::FieldConfig | Method::Conditional => kind.is_field(),
            Method::Choices => kind == K::Choice,
            Method::Collapsed | Method::EndRepeater => kind == K::Repeater,
            Method::EndGroup => kind == K::Group,
            Method::Layouts | Method::EndFlexibleContent => kind == K::FlexibleContent,
            Method::Endpoint => matches!(kind, K::Tab | K::Accordion),
        }
    }
}

pub(crate) enum Node<'a> {
    Fields(&'a FieldsBuilder),
    Field(&'a FieldBuilder),
    Conditional(&'a ConditionalBuilder),
    Location(&'a LocationBuilder),
}

pub(crate) enum NodeMut<'a> {
    Fields(&'a mut FieldsBuilder),
    Field(&'a mut FieldBuilder),
    Conditional(&'a mut ConditionalBuilder),
    Location(&'a mut LocationBuilder),
}

fn resolve<'a>(root: &'a FieldsBuilder, path: &[Step]) -> Option<Node<'a>> {
    let mut node = Node::Fields(root);
    for step in path {
        node = match (node, *step) {
            (Node::Fields(fields), Step::Field(index)) => {
                Node::Field(fields.fields().entry(index)?.as_field()?)
            }
            (Node::Field(field), Step::Field(index)) => {
                Node::Field(field.inner_fields()?.fields().entry(index)?.as_field()?)
            }
            (Node::Field(field), Step::Layout(index)) => {
                Node::Fields(field.as_flexible_content()?.layouts().get(index)?)
            }
            (Node::Field(field), Step::Conditional) => Node::Conditional(field.conditional_logic()?),
            (Node::Fields(fields), Step::Location) => Node::Location(fields.location()?),
            _ => return None,
        };
    }
    Some(node)
}

fn resolve_mut<'a>(root: &'a mut FieldsBuilder, path: &[Step]) -> Option<NodeMut<'a>> {
    let mut node = NodeMut::Fields(root);
    for step in path {
        node = match (node, *step) {
            (NodeMut::Fields(fields), Step::Field(index)) => {
                NodeMut::Field(fields.fields_mut().entry_mut(index)?.as_field_mut()?)
            }
            (NodeMut::Field(field), Step::Field(index)) => NodeMut::Field(
                field
                    .inner_fields_mut()?
                    .fields_mut()
                    .entry_mut(index)?
                    .as_field_mut()?,
            ),
            (NodeMut::Field(field), Step::Layout(index)) => {
                NodeMut::Fields(field.as_flexible_content_mut()?.layouts_mut().get_mut(index)?)
            }
            (NodeMut::Field(field), Step::Conditional) => {
                NodeMut::Conditional(field.conditional_logic_mut()?)
            }
            (NodeMut::Fields(fields), Step::Location) => NodeMut::Location(fields.location_mut()?),
            _ => return None,
        };
    }
    Some(node)
}

fn kind_of(node: &Node<'_>, last: Option<&Step>) -> ContextKind {
    match node {
        Node::Fields(_) if matches!(last, Some(Step::Layout(_))) => ContextKind::Layout,
        Node::Fields(_) => ContextKind::Fields,
        Node::Field(field) => match field.kind() {
            FieldKind::Basic => ContextKind::Field,
            FieldKind::Tab => ContextKind::Tab,
            FieldKind::Accordion => ContextKind::Accordion,
            FieldKind::Choice(_) => ContextKind::Choice,
            FieldKind::Group(_) => ContextKind::Group,
            FieldKind::Repeater(_) => ContextKind::Repeater,
            FieldKind::FlexibleContent(_) => ContextKind::FlexibleContent,
        },
        Node::Conditional(_) => ContextKind::Conditional,
        Node::Location(_) => ContextKind::Location,
    }
}

/// Fluent cursor over a builder tree. See the module docs.
pub struct Context<'a> {
    root: &'a mut FieldsBuilder,
    path: Vec<Step>,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root.name())
            .field("path", &self.path)
            .finish()
    }
}

impl<'a> Context<'a> {
    pub(crate) fn new(root: &'a mut FieldsBuilder) -> Self {
        Self {
            root,
            path: Vec::new(),
        }
    }

    pub fn path(&self) -> &[Step] {
        &self.path
    }

    /// The kind of builder the cursor is on.
    pub fn kind(&self) -> Result<ContextKind> {
        self.kind_at(self.path.len())
    }

    /// The name of the current field or fields builder. Rule builders have none.
    pub fn name(&self) -> Option<&str> {
        match resolve(self.root, &self.path)? {
            Node::Fields(fields) => Some(fields.name()),
            Node::Field(field) => Some(field.name()),
            Node::Conditional(_) | Node::Location(_) => None,
        }
    }

    /// The enclosing context, or `None` on the root.
    pub fn get_parent_context(mut self) -> Option<Self> {
        self.path.pop()?;
        Some(self)
    }

    pub fn get_root_context(mut self) -> Self {
        self.path.clear();
        self
    }

    /// Build whatever the cursor is on.
    pub fn build(&self) -> Result<Value> {
        match self.node()? {
            Node::Fields(fields) => Ok(fields.build()),
            Node::Field(field) => Ok(field.build()),
            Node::Conditional(rules) => Ok(rules.build()),
            Node::Location(rules) => Ok(rules.build()),
        }
    }

    // Collection

    /// Add a field of any type and move onto it.
    pub fn add_field(self, name: impl Into<String>, field_type: impl Into<String>) -> Result<Self> {
        self.add_field_builder(FieldBuilder::new(name, field_type))
    }

    pub fn add_field_with(
        self,
        name: impl Into<String>,
        field_type: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<Self> {
        self.add_field_builder(FieldBuilder::with_config(name, field_type, config))
    }

    /// Add an independently built field and move onto it.
    pub fn add_field_builder(mut self, field: FieldBuilder) -> Result<Self> {
        self.delegate("add_field", Method::Collection)?;
        let index = self.collection_mut()?.push_field(field)?;
        self.path.push(Step::Field(index));
        Ok(self)
    }

    /// Add a raw mapping or other entry; the cursor stays on the collection.
    pub fn add_entry(mut self, entry: impl Into<FieldEntry>) -> Result<Self> {
        self.delegate("add_entry", Method::Collection)?;
        self.collection_mut()?.push_field(entry)?;
        Ok(self)
    }

    /// Copy every field of `other` into the current collection.
    pub fn add_fields(mut self, other: &FieldsBuilder) -> Result<Self> {
        self.delegate("add_fields", Method::Collection)?;
        self.collection_mut()?.add_fields(other)?;
        Ok(self)
    }

    pub fn remove_field(mut self, name: &str) -> Result<Self> {
        self.delegate("remove_field", Method::Collection)?;
        self.collection_mut()?.remove_field(name)?;
        Ok(self)
    }

    pub fn modify_field(mut self, name: &str, modifications: Map<String, Value>) -> Result<Self> {
        self.delegate("modify_field", Method::Collection)?;
        self.collection_mut()?.modify_field(name, modifications)?;
        Ok(self)
    }

    /// Whether the nearest collection holds a field with this name.
    pub fn field_exists(&self, name: &str) -> Result<bool> {
        let depth = self.implementer_depth("field_exists", Method::Collection)?;
        match resolve(self.root, &self.path[..depth]) {
            Some(Node::Fields(fields)) => Ok(fields.field_exists(name)),
            Some(Node::Field(field)) => Ok(field
                .inner_fields()
                .is_some_and(|fields| fields.field_exists(name))),
            _ => Err(self.detached()),
        }
    }

    // Root and group configuration

    /// Place the root group and move onto its location rules.
    pub fn set_location(
        mut self,
        param: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.delegate("set_location", Method::SetLocation)?;
        self.root.set_location(param, operator, value);
        self.path.push(Step::Location);
        Ok(self)
    }

    pub fn set_group_config(mut self, key: &str, value: impl Into<Value>) -> Result<Self> {
        self.delegate("set_group_config", Method::GroupConfig)?;
        self.collection_mut()?.set_group_config(key, value);
        Ok(self)
    }

    // Rules

    /// Append a clause to the last OR group of the current rules.
    pub fn and(
        mut self,
        subject: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.delegate("and", Method::Rule)?;
        let err = self.detached();
        match resolve_mut(self.root, &self.path) {
            Some(NodeMut::Conditional(rules)) => {
                rules.and(subject, operator, value);
            }
            Some(NodeMut::Location(rules)) => {
                rules.and(subject, operator, value);
            }
            _ => return Err(err),
        }
        Ok(self)
    }

    /// Start a new OR group on the current rules.
    pub fn or(
        mut self,
        subject: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.delegate("or", Method::Rule)?;
        let err = self.detached();
        match resolve_mut(self.root, &self.path) {
            Some(NodeMut::Conditional(rules)) => {
                rules.or(subject, operator, value);
            }
            Some(NodeMut::Location(rules)) => {
                rules.or(subject, operator, value);
            }
            _ => return Err(err),
        }
        Ok(self)
    }

    // Field configuration

    /// Attach conditional logic to the current field and move onto it.
    pub fn conditional(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.delegate("conditional", Method::Conditional)?;
        self.field_mut()?.conditional(field, operator, value);
        self.path.push(Step::Conditional);
        Ok(self)
    }

    pub fn set_key(self, key: &str) -> Result<Self> {
        self.with_field("set_key", |field| {
            field.set_key(key);
        })
    }

    pub fn set_custom_key(self, key: &str) -> Result<Self> {
        self.with_field("set_custom_key", |field| {
            field.set_custom_key(key);
        })
    }

    pub fn set_label(self, label: impl Into<String>) -> Result<Self> {
        self.with_field("set_label", |field| {
            field.set_label(label);
        })
    }

    /// Write one config value on the current field. Renaming checks the
    /// owning collection first.
    pub fn set_config(mut self, key: &str, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        self.delegate("set_config", Method::FieldConfig)?;
        if key == "name" {
            if let Some(name) = value.as_str() {
                self.check_rename(name)?;
            }
        }
        self.field_mut()?.set_config(key, value);
        Ok(self)
    }

    pub fn set_required(self) -> Result<Self> {
        self.with_field("set_required", |field| {
            field.set_required();
        })
    }

    pub fn set_unrequired(self) -> Result<Self> {
        self.with_field("set_unrequired", |field| {
            field.set_unrequired();
        })
    }

    pub fn set_instructions(self, instructions: impl Into<String>) -> Result<Self> {
        self.with_field("set_instructions", |field| {
            field.set_instructions(instructions);
        })
    }

    pub fn set_default_value(self, value: impl Into<Value>) -> Result<Self> {
        self.with_field("set_default_value", |field| {
            field.set_default_value(value);
        })
    }

    pub fn set_wrapper(self, wrapper: Map<String, Value>) -> Result<Self> {
        self.with_field("set_wrapper", |field| {
            field.set_wrapper(wrapper);
        })
    }

    pub fn set_width(self, width: impl Into<Value>) -> Result<Self> {
        self.with_field("set_width", |field| {
            field.set_width(width);
        })
    }

    pub fn set_attr(self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.with_field("set_attr", |field| {
            field.set_attr(name, value);
        })
    }

    pub fn set_selector(self, css: &str) -> Result<Self> {
        self.with_field("set_selector", |field| {
            field.set_selector(css);
        })
    }

    /// Read the key of the nearest field.
    pub fn get_key(&self) -> Result<String> {
        let depth = self.implementer_depth("get_key", Method::FieldConfig)?;
        match resolve(self.root, &self.path[..depth]) {
            Some(Node::Field(field)) => Ok(field.get_key()),
            _ => Err(self.detached()),
        }
    }

    // Dispatch

    /// Move the cursor down into a builder owned by the current one.
    pub(crate) fn enter(&mut self, step: Step) {
        self.path.push(step);
    }

    /// Move the cursor up to the nearest builder implementing `method`.
    pub(crate) fn delegate(&mut self, call: &'static str, method: Method) -> Result<()> {
        let depth = self.implementer_depth(call, method)?;
        if depth < self.path.len() {
            debug!(
                call,
                from = %self.describe(),
                hops = self.path.len() - depth,
                "delegating to enclosing builder"
            );
            self.path.truncate(depth);
        } else {
            trace!(call, context = %self.describe(), "dispatch");
        }
        Ok(())
    }

    /// Leave the composite implementing `method`, returning to its owner.
    pub(crate) fn end(mut self, call: &'static str, method: Method) -> Result<Self> {
        self.delegate(call, method)?;
        self.path.pop();
        Ok(self)
    }

    fn implementer_depth(&self, call: &'static str, method: Method) -> Result<usize> {
        for depth in (0..=self.path.len()).rev() {
            if method.implemented_by(self.kind_at(depth)?) {
                return Ok(depth);
            }
        }
        Err(BuilderError::NoSuchMethod {
            method: call,
            context: self.describe(),
        })
    }

    fn kind_at(&self, depth: usize) -> Result<ContextKind> {
        let path = &self.path[..depth];
        resolve(self.root, path)
            .map(|node| kind_of(&node, path.last()))
            .ok_or_else(|| self.detached())
    }

    pub(crate) fn node(&self) -> Result<Node<'_>> {
        resolve(self.root, &self.path).ok_or_else(|| self.detached())
    }

    pub(crate) fn field_mut(&mut self) -> Result<&mut FieldBuilder> {
        let err = self.detached();
        match resolve_mut(self.root, &self.path) {
            Some(NodeMut::Field(field)) => Ok(field),
            _ => Err(err),
        }
    }

    /// The fields builder owning the current collection.
    pub(crate) fn collection_mut(&mut self) -> Result<&mut FieldsBuilder> {
        let err = self.detached();
        match resolve_mut(self.root, &self.path) {
            Some(NodeMut::Fields(fields)) => Ok(fields),
            Some(NodeMut::Field(field)) => field.inner_fields_mut().ok_or(err),
            _ => Err(err),
        }
    }

    fn with_field(mut self, call: &'static str, apply: impl FnOnce(&mut FieldBuilder)) -> Result<Self> {
        self.delegate(call, Method::FieldConfig)?;
        apply(self.field_mut()?);
        Ok(self)
    }

    /// Fail when the current field's siblings already use `name`.
    fn check_rename(&self, name: &str) -> Result<()> {
        let Some((_, owner)) = self.path.split_last() else {
            return Ok(());
        };
        let current = self.name();
        if current == Some(name) {
            return Ok(());
        }
        let taken = match resolve(self.root, owner) {
            Some(Node::Fields(fields)) => fields.field_exists(name),
            Some(Node::Field(field)) => field
                .inner_fields()
                .is_some_and(|fields| fields.field_exists(name)),
            _ => false,
        };
        if taken {
            return Err(BuilderError::NameCollision {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn detached(&self) -> BuilderError {
        BuilderError::DetachedContext {
            path: self.describe(),
        }
    }

    fn describe(&self) -> String {
        let mut description = self.root.name().to_string();
        for step in &self.path {
            match step {
                Step::Field(index) => description.push_str(&format!("/field[{index}]")),
                Step::Layout(index) => description.push_str(&format!("/layout[{index}]")),
                Step::Conditional => description.push_str("/conditional"),
                Step::Location => description.push_str("/location"),
            }
        }
        description
    }
}

/// Generates `add_<type>(name)` shortcuts on both [`Context`] and
/// [`FieldsBuilder`].
macro_rules! field_adders {
    ($($method:ident => $adder:ident($field_type:literal);)*) => {
        impl<'a> Context<'a> {
            $(
                pub fn $method(self, name: impl Into<String>) -> Result<Self> {
                    self.$adder(name, $field_type)
                }
            )*
        }

        impl FieldsBuilder {
            $(
                pub fn $method(&mut self, name: impl Into<String>) -> Result<Context<'_>> {
                    self.context().$method(name)
                }
            )*
        }
    };
}

field_adders! {
    add_text => add_field("text");
    add_textarea => add_field("textarea");
    add_number => add_field("number");
    add_range => add_field("range");
    add_email => add_field("email");
    add_url => add_field("url");
    add_password => add_field("password");
    add_wysiwyg => add_field("wysiwyg");
    add_oembed => add_field("oembed");
    add_image => add_field("image");
    add_file => add_field("file");
    add_gallery => add_field("gallery");
    add_true_false => add_field("true_false");
    add_date_picker => add_field("date_picker");
    add_time_picker => add_field("time_picker");
    add_date_time_picker => add_field("date_time_picker");
    add_color_picker => add_field("color_picker");
    add_google_map => add_field("google_map");
    add_link => add_field("link");
    add_post_object => add_field("post_object");
    add_page_link => add_field("page_link");
    add_relationship => add_field("relationship");
    add_taxonomy => add_field("taxonomy");
    add_user => add_field("user");
    add_select => add_choice_field("select");
    add_radio => add_choice_field("radio");
    add_checkbox => add_choice_field("checkbox");
    add_button_group => add_choice_field("button_group");
}

impl FieldsBuilder {
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Result<Context<'_>> {
        self.context().add_field(name, field_type)
    }

    pub fn add_field_with(
        &mut self,
        name: impl Into<String>,
        field_type: impl Into<String>,
        config: Map<String, Value>,
    ) -> Result<Context<'_>> {
        self.context().add_field_with(name, field_type, config)
    }

    pub fn add_field_builder(&mut self, field: FieldBuilder) -> Result<Context<'_>> {
        self.context().add_field_builder(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn adders_move_onto_the_new_field() {
        let mut builder = FieldsBuilder::new("page");
        let context = builder.add_text("title").unwrap();
        assert_eq!(context.kind().unwrap(), ContextKind::Field);
        assert_eq!(context.name(), Some("title"));
        assert_eq!(context.path(), &[Step::Field(0)]);
    }

    #[test]
    fn field_calls_fall_back_to_the_collection() {
        let mut builder = FieldsBuilder::new("page");
        builder
            .add_text("title")
            .unwrap()
            .set_required()
            .unwrap()
            .add_textarea("summary")
            .unwrap()
            .set_instructions("Two sentences")
            .unwrap();

        let built = builder.build();
        assert_eq!(built["fields"][0]["required"], json!(true));
        assert!(built["fields"][0].get("instructions").is_none());
        assert_eq!(built["fields"][1]["instructions"], json!("Two sentences"));
    }

    #[test]
    fn conditional_chain_returns_to_collection() {
        let mut builder = FieldsBuilder::new("page");
        builder
            .add_true_false("has_cta")
            .unwrap()
            .add_url("cta_url")
            .unwrap()
            .conditional("has_cta", "==", "1")
            .unwrap()
            .and("has_cta", "!=", "")
            .unwrap()
            .add_text("cta_label")
            .unwrap();

        let built = builder.build();
        assert_eq!(
            built["fields"][1]["conditional_logic"],
            json!([[
                {"field": "field_page_has_cta", "operator": "==", "value": "1"},
                {"field": "field_page_has_cta", "operator": "!=", "value": ""}
            ]])
        );
        assert_eq!(built["fields"][2]["name"], json!("cta_label"));
    }

    #[test]
    fn set_location_is_reachable_from_any_depth() {
        let mut builder = FieldsBuilder::new("page");
        let context = builder
            .add_text("title")
            .unwrap()
            .conditional("title", "!=", "")
            .unwrap()
            .set_location("post_type", "==", "page")
            .unwrap()
            .or("post_type", "==", "post")
            .unwrap();
        assert_eq!(context.kind().unwrap(), ContextKind::Location);
        assert_eq!(
            builder.build()["location"],
            json!([
                [{"param": "post_type", "operator": "==", "value": "page"}],
                [{"param": "post_type", "operator": "==", "value": "post"}]
            ])
        );
    }

    #[test]
    fn unimplemented_calls_fail_with_the_method_name() {
        let mut builder = FieldsBuilder::new("page");
        let err = builder
            .add_text("title")
            .unwrap()
            .and("x", "==", 1)
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::NoSuchMethod {
                method: "and",
                context: "page/field[0]".into()
            }
        );
    }

    #[test]
    fn rename_checks_siblings() {
        let mut builder = FieldsBuilder::new("page");
        builder.add_text("a").unwrap();
        let err = builder
            .add_text("b")
            .unwrap()
            .set_config("name", "a")
            .unwrap_err();
        assert_eq!(err, BuilderError::NameCollision { name: "a".into() });

        builder
            .context()
            .add_text("c")
            .unwrap()
            .set_config("name", "renamed")
            .unwrap();
        assert!(builder.field_exists("renamed"));
        assert!(!builder.field_exists("c"));
    }

    #[test]
    fn parent_and_root_navigation() {
        let mut builder = FieldsBuilder::new("page");
        let context = builder.add_text("title").unwrap();
        let parent = context.get_parent_context().unwrap();
        assert_eq!(parent.kind().unwrap(), ContextKind::Fields);
        assert!(parent.get_parent_context().is_none());

        let context = builder
            .add_text("summary")
            .unwrap()
            .conditional("title", "!=", "")
            .unwrap()
            .get_root_context();
        assert!(context.path().is_empty());
    }

    #[test]
    fn context_builds_current_node() {
        let mut builder = FieldsBuilder::new("page");
        let context = builder
            .add_text("title")
            .unwrap()
            .set_key("headline")
            .unwrap();
        assert_eq!(context.get_key().unwrap(), "field_headline");
        assert_eq!(context.build().unwrap()["key"], json!("field_headline"));
    }

    #[test]
    fn raw_entries_keep_the_cursor_on_the_collection() {
        let mut builder = FieldsBuilder::new("page");
        let context = builder
            .context()
            .add_entry(json!({"name": "legacy", "type": "text"}))
            .unwrap();
        assert_eq!(context.kind().unwrap(), ContextKind::Fields);
        assert!(context.field_exists("legacy").unwrap());
    }

    #[test]
    fn remove_and_modify_through_the_cursor() {
        let mut builder = FieldsBuilder::new("page");
        let mut modifications = Map::new();
        modifications.insert("placeholder".into(), json!("Search"));
        builder
            .add_text("a")
            .unwrap()
            .add_text("b")
            .unwrap()
            .remove_field("a")
            .unwrap()
            .modify_field("b", modifications)
            .unwrap();

        let built = builder.build();
        assert_eq!(built["fields"].as_array().map(Vec::len), Some(1));
        assert_eq!(built["fields"][0]["placeholder"], json!("Search"));
    }
}
