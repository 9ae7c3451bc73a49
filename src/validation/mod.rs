// Declarative request validation
//
// Each request record declares a rule table once; `validate` walks it in
// declaration order and collects field errors.

pub mod rules;
pub mod validator;

pub use rules::{evaluate, FieldValue, Rule};
pub use validator::{validate, validate_optional, FieldError, RuleTable, ValidationErrors, Validate, WireName};
