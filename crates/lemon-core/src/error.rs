//! Domain errors

use std::collections::BTreeMap;

use thiserror::Error;
use validator::ValidationErrors;

/// Field name to the messages raised against it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Unauthenticated(String),

    #[error("You are not allowed to perform this action")]
    Forbidden,

    #[error("Cart is empty")]
    CartEmpty,

    #[error("Invalid ordering field: {0}")]
    InvalidOrdering(String),

    #[error("Invalid value for query parameter {name}: {value}")]
    InvalidQuery { name: &'static str, value: String },

    #[error("{0}")]
    Duplicate(String),

    #[error("Cannot delete {table} row: still referenced by {referenced_by}")]
    Protected {
        table: &'static str,
        referenced_by: &'static str,
    },

    #[error("Unable to log in with provided credentials")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        DomainError::Validation(errors)
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({})", e.code),
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        DomainError::Validation(fields)
    }
}

fn summarize(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
