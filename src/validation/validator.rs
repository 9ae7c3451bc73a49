use serde::Serialize;
use std::fmt;

use super::rules::{parse_rules, FieldValue, Rule};

/// A single field-level validation failure, reported under the field's wire name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered validation result: field declaration order, then rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    fn push(&mut self, field: &str, message: String) {
        self.0.push(FieldError {
            field: field.to_string(),
            message,
        });
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// How a field is named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireName {
    /// Serialized under its declared name.
    Declared,
    /// Serialized under an explicit alias.
    Alias(&'static str),
    /// Not serialized; still validated, reported under its declared name.
    Skipped,
}

type Accessor<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

struct FieldRules<T> {
    name: &'static str,
    wire: WireName,
    rules: Vec<Rule>,
    value: Accessor<T>,
}

impl<T> FieldRules<T> {
    fn wire_name(&self) -> &'static str {
        match self.wire {
            WireName::Alias(alias) => alias,
            WireName::Declared | WireName::Skipped => self.name,
        }
    }
}

/// Declarative rule table for one record type, built once per type.
pub struct RuleTable<T> {
    fields: Vec<FieldRules<T>>,
}

impl<T> Default for RuleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RuleTable<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare a field serialized under its own name.
    pub fn field(self, name: &'static str, rules: &str, value: Accessor<T>) -> Self {
        self.push(name, WireName::Declared, rules, value)
    }

    /// Declare a field serialized under `alias`.
    pub fn aliased(self, name: &'static str, alias: &'static str, rules: &str, value: Accessor<T>) -> Self {
        self.push(name, WireName::Alias(alias), rules, value)
    }

    /// Declare a field that never appears on the wire.
    pub fn skipped(self, name: &'static str, rules: &str, value: Accessor<T>) -> Self {
        self.push(name, WireName::Skipped, rules, value)
    }

    fn push(mut self, name: &'static str, wire: WireName, rules: &str, value: Accessor<T>) -> Self {
        self.fields.push(FieldRules {
            name,
            wire,
            rules: parse_rules(rules),
            value,
        });
        self
    }

    /// Run every rule of every field against `record`.
    pub fn check(&self, record: &T) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for field in &self.fields {
            if field.rules.is_empty() {
                continue;
            }
            let value = (field.value)(record);
            for rule in &field.rules {
                if let Some(message) = rule.check(&value) {
                    errors.push(field.wire_name(), message);
                }
            }
        }
        errors
    }
}

/// Records that carry a rule table.
pub trait Validate: Sized + 'static {
    fn rule_table() -> &'static RuleTable<Self>;

    fn validate(&self) -> ValidationErrors {
        Self::rule_table().check(self)
    }
}

/// Validate a record.
pub fn validate<R: Validate>(record: &R) -> ValidationErrors {
    record.validate()
}

/// Validate an optional record; an absent record has nothing to report.
pub fn validate_optional<R: Validate>(record: Option<&R>) -> ValidationErrors {
    record.map(Validate::validate).unwrap_or_default()
}
