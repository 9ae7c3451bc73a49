// Field rule interpreter
//
// A field's rule specification is a comma-separated list of tokens, each a
// bare name (`required`, `email`) or `name=value` (`min=1`, `max=200`).

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// Runtime view of a field value as seen by the rule checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    /// Any collection; only its length matters.
    List(usize),
    Int(i64),
    Bool(bool),
    /// Absent optional value.
    Null,
}

impl FieldValue<'_> {
    /// Zero/empty form for the value's type.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::List(len) => *len == 0,
            FieldValue::Null => true,
            FieldValue::Int(_) | FieldValue::Bool(_) => false,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Str(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for FieldValue<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            Some(s) => FieldValue::Str(s.as_str()),
            None => FieldValue::Null,
        }
    }
}

impl<'a, T> From<&'a Vec<T>> for FieldValue<'a> {
    fn from(value: &'a Vec<T>) -> Self {
        FieldValue::List(value.len())
    }
}

impl From<&i64> for FieldValue<'_> {
    fn from(value: &i64) -> Self {
        FieldValue::Int(*value)
    }
}

impl From<&bool> for FieldValue<'_> {
    fn from(value: &bool) -> Self {
        FieldValue::Bool(*value)
    }
}

/// A single parsed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Min(i64),
    Max(i64),
    Email,
}

impl Rule {
    /// Build a rule from its name and optional parameter.
    ///
    /// Unknown names and non-integer bounds yield `None`: the rule is skipped,
    /// never reported as a request error.
    pub fn from_parts(name: &str, param: Option<&str>) -> Option<Rule> {
        match name {
            "required" => Some(Rule::Required),
            "email" => Some(Rule::Email),
            "min" => parse_bound(param).map(Rule::Min),
            "max" => parse_bound(param).map(Rule::Max),
            _ => None,
        }
    }

    /// Parse one `name` or `name=value` token, splitting on the first `=`.
    pub fn parse(token: &str) -> Option<Rule> {
        match token.split_once('=') {
            Some((name, param)) => Rule::from_parts(name, Some(param)),
            None => Rule::from_parts(token, None),
        }
    }

    /// Evaluate against a value, returning the failure message if any.
    pub fn check(&self, value: &FieldValue<'_>) -> Option<String> {
        match (self, value) {
            (Rule::Required, v) if v.is_empty() => Some("is required".to_string()),
            (Rule::Min(n), FieldValue::Str(s)) if char_len(s) < *n => {
                Some(format!("must be at least {} characters", n))
            }
            (Rule::Max(n), FieldValue::Str(s)) if char_len(s) > *n => {
                Some(format!("must be at most {} characters", n))
            }
            (Rule::Email, FieldValue::Str(s)) if !s.is_empty() && !EMAIL_PATTERN.is_match(s) => {
                Some("must be a valid email address".to_string())
            }
            _ => None,
        }
    }
}

fn parse_bound(param: Option<&str>) -> Option<i64> {
    param.and_then(|p| p.parse::<i64>().ok())
}

fn char_len(s: &str) -> i64 {
    s.chars().count() as i64
}

/// Parse a full rule specification, dropping unknown or malformed rules.
pub fn parse_rules(spec: &str) -> Vec<Rule> {
    if spec.is_empty() {
        return Vec::new();
    }
    spec.split(',').filter_map(Rule::parse).collect()
}

/// Evaluate one named rule against a value.
pub fn evaluate(value: &FieldValue<'_>, rule_name: &str, rule_param: Option<&str>) -> Option<String> {
    Rule::from_parts(rule_name, rule_param).and_then(|rule| rule.check(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_empty_forms() {
        assert_eq!(evaluate(&FieldValue::Str(""), "required", None).as_deref(), Some("is required"));
        assert!(evaluate(&FieldValue::List(0), "required", None).is_some());
        assert!(evaluate(&FieldValue::Null, "required", None).is_some());
        assert!(evaluate(&FieldValue::Str("x"), "required", None).is_none());
        assert!(evaluate(&FieldValue::Int(0), "required", None).is_none());
        assert!(evaluate(&FieldValue::List(2), "required", None).is_none());
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let three = FieldValue::Str("abc");
        assert!(evaluate(&three, "min", Some("3")).is_none());
        assert!(evaluate(&three, "max", Some("3")).is_none());
        assert_eq!(
            evaluate(&three, "min", Some("4")).as_deref(),
            Some("must be at least 4 characters")
        );
        assert_eq!(
            evaluate(&three, "max", Some("2")).as_deref(),
            Some("must be at most 2 characters")
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let accented = FieldValue::Str("héé");
        assert!(evaluate(&accented, "max", Some("3")).is_none());
    }

    #[test]
    fn length_rules_ignore_non_strings() {
        assert!(evaluate(&FieldValue::Int(1), "min", Some("5")).is_none());
        assert!(evaluate(&FieldValue::List(0), "min", Some("5")).is_none());
        assert!(evaluate(&FieldValue::Null, "max", Some("0")).is_none());
    }

    #[test]
    fn malformed_bounds_are_skipped() {
        assert!(evaluate(&FieldValue::Str(""), "min", Some("ten")).is_none());
        assert!(evaluate(&FieldValue::Str("long"), "max", None).is_none());
        assert_eq!(Rule::parse("min="), None);
    }

    #[test]
    fn unknown_rules_are_ignored() {
        assert!(evaluate(&FieldValue::Str(""), "uuid", None).is_none());
        assert_eq!(parse_rules("required,future_rule,max=5"), vec![Rule::Required, Rule::Max(5)]);
    }

    #[test]
    fn email_pattern() {
        assert!(evaluate(&FieldValue::Str("a@b.co"), "email", None).is_none());
        assert!(evaluate(&FieldValue::Str("first.last+tag@mail.example.org"), "email", None).is_none());
        assert_eq!(
            evaluate(&FieldValue::Str("a@b"), "email", None).as_deref(),
            Some("must be a valid email address")
        );
        assert!(evaluate(&FieldValue::Str("a@b.c"), "email", None).is_some());
        assert!(evaluate(&FieldValue::Str("no-at-sign.com"), "email", None).is_some());
        assert!(evaluate(&FieldValue::Str(""), "email", None).is_none());
    }

    #[test]
    fn parse_splits_on_first_equals() {
        assert_eq!(Rule::parse("max=200"), Some(Rule::Max(200)));
        assert_eq!(Rule::parse("max=2=0"), None);
        assert_eq!(Rule::parse("email"), Some(Rule::Email));
        assert!(parse_rules("").is_empty());
    }
}
