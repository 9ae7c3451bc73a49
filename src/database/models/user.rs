use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{RuleTable, Validate};

/// Stored identity. The password hash never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn rule_table() -> &'static RuleTable<Self> {
        static RULES: Lazy<RuleTable<RegisterRequest>> = Lazy::new(|| {
            RuleTable::<RegisterRequest>::new()
                .field("name", "required,min=2,max=100", |r| (&r.name).into())
                .field("email", "required,email", |r| (&r.email).into())
                .field("password", "required,min=6", |r| (&r.password).into())
        });
        &RULES
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn rule_table() -> &'static RuleTable<Self> {
        static RULES: Lazy<RuleTable<LoginRequest>> = Lazy::new(|| {
            RuleTable::<LoginRequest>::new()
                .field("email", "required,email", |r| (&r.email).into())
                .field("password", "required", |r| (&r.password).into())
        });
        &RULES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    #[test]
    fn test_register_request_rules() {
        let req = RegisterRequest {
            name: "J".into(),
            email: "john@example".into(),
            password: "12345".into(),
        };
        let errors = validate(&req).into_vec();
        let pairs: Vec<(&str, &str)> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("name", "must be at least 2 characters"),
                ("email", "must be a valid email address"),
                ("password", "must be at least 6 characters"),
            ]
        );
    }

    #[test]
    fn test_empty_login_request() {
        let errors = validate(&LoginRequest::default()).into_vec();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.message == "is required"));
    }

    #[test]
    fn test_missing_json_fields_become_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        let fields: Vec<String> = validate(&req).into_vec().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "name", "password", "password"]);
    }

    #[test]
    fn test_response_omits_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 1,
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password_hash: "$argon2id$...".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(user.to_response()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "jane@example.com");
    }
}
