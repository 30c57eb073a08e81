//! OR-of-AND rule builders for conditional visibility and group placement.
//!
//! Both builders share one shape: an ordered list of OR groups, each an
//! ordered list of AND clauses. They differ only in the key naming the
//! clause subject (`field` for conditional logic, `param` for locations).

use std::marker::PhantomData;

use serde_json::{Map, Value};

/// Names the subject key of a clause.
pub trait RuleKind {
    /// Key under which the clause subject is emitted.
    const SUBJECT_KEY: &'static str;
}

/// Clauses reference sibling fields: `{field, operator, value}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalRule;

impl RuleKind for ConditionalRule {
    const SUBJECT_KEY: &'static str = "field";
}

/// Clauses reference host placement parameters: `{param, operator, value}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRule;

impl RuleKind for LocationRule {
    const SUBJECT_KEY: &'static str = "param";
}

/// One `{subject, operator, value}` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub subject: String,
    pub operator: String,
    pub value: Value,
}

impl Clause {
    pub fn new(subject: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    fn build<K: RuleKind>(&self) -> Value {
        let mut clause = Map::new();
        clause.insert(K::SUBJECT_KEY.to_string(), Value::String(self.subject.clone()));
        clause.insert("operator".to_string(), Value::String(self.operator.clone()));
        clause.insert("value".to_string(), self.value.clone());
        Value::Object(clause)
    }
}

/// Builds a rule set. There is always at least one OR group holding at
/// least one clause, seeded by the constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBuilder<K> {
    groups: Vec<Vec<Clause>>,
    kind: PhantomData<K>,
}

/// Conditional visibility of a field.
pub type ConditionalBuilder = RuleBuilder<ConditionalRule>;

/// Placement of a top-level field group.
pub type LocationBuilder = RuleBuilder<LocationRule>;

impl<K: RuleKind> RuleBuilder<K> {
    pub fn new(subject: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            groups: vec![vec![Clause::new(subject, operator, value)]],
            kind: PhantomData,
        }
    }

    /// Append a clause to the last OR group.
    pub fn and(
        &mut self,
        subject: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        let clause = Clause::new(subject, operator, value);
        match self.groups.last_mut() {
            Some(group) => group.push(clause),
            None => self.groups.push(vec![clause]),
        }
        self
    }

    /// Start a new OR group seeded with one clause.
    pub fn or(
        &mut self,
        subject: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.groups.push(vec![Clause::new(subject, operator, value)]);
        self
    }

    pub fn groups(&self) -> &[Vec<Clause>] {
        &self.groups
    }

    /// The rule set as `[[{subject, operator, value}, ...], ...]`.
    pub fn build(&self) -> Value {
        Value::Array(
            self.groups
                .iter()
                .map(|group| Value::Array(group.iter().map(Clause::build::<K>).collect()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructor_seeds_one_group() {
        let rules = ConditionalBuilder::new("a", "==", "1");
        assert_eq!(rules.groups().len(), 1);
        assert_eq!(rules.build(), json!([[{"field": "a", "operator": "==", "value": "1"}]]));
    }

    #[test]
    fn or_starts_group_and_extends_last() {
        let mut rules = ConditionalBuilder::new("a", "==", "1");
        rules.or("b", ">", "5").and("b", "<", "10");
        assert_eq!(
            rules.build(),
            json!([
                [{"field": "a", "operator": "==", "value": "1"}],
                [
                    {"field": "b", "operator": ">", "value": "5"},
                    {"field": "b", "operator": "<", "value": "10"}
                ]
            ])
        );
    }

    #[test]
    fn and_before_or_stays_in_first_group() {
        let mut rules = ConditionalBuilder::new("a", "==", 1);
        rules.and("b", "!=", true);
        assert_eq!(rules.groups().len(), 1);
        assert_eq!(rules.groups()[0].len(), 2);
        assert_eq!(rules.groups()[0][1].value, json!(true));
    }

    #[test]
    fn location_clauses_use_param() {
        let mut location = LocationBuilder::new("post_type", "==", "page");
        location.or("page_template", "==", "home.php");
        assert_eq!(
            location.build(),
            json!([
                [{"param": "post_type", "operator": "==", "value": "page"}],
                [{"param": "page_template", "operator": "==", "value": "home.php"}]
            ])
        );
    }
}
