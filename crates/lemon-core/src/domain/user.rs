//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Compact user rendering embedded in carts, orders and group listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i32,
    pub username: String,
}

/// Sign-up payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Registration {
    #[validate(
        length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    #[serde(default)]
    pub email: Option<String>,

    pub password: String,
}

/// Row to insert once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Letters, digits and `@ . + - _` only.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_charset");
        err.message = Some(
            "Username may contain only letters, numbers, and @/./+/-/_ characters".into(),
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, email: Option<&str>) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.map(str::to_string),
            password: "secret-pass".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration("mario.b+1@lemon", Some("mario@lemon.com")).validate().is_ok());
        assert!(registration("adrian", None).validate().is_ok());
    }

    #[test]
    fn test_username_rules() {
        assert!(registration("", None).validate().is_err());
        assert!(registration("has space", None).validate().is_err());
        assert!(registration(&"u".repeat(151), None).validate().is_err());
    }

    #[test]
    fn test_email_rule() {
        assert!(registration("adrian", Some("not-an-email")).validate().is_err());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            username: "adrian".to_string(),
            email: String::new(),
            password_hash: "$argon2id$secret".to_string(),
            is_superuser: false,
            date_joined: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}
