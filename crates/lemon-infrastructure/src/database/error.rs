//! sqlx error translation

use tracing::error;

use lemon_core::error::DomainError;

/// Map a driver error to the domain. Constraint violations surface as client
/// errors, everything else as a database failure.
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    if let Some(db_err) = err.as_database_error() {
        let constraint = db_err.constraint().unwrap_or_default().to_string();
        if db_err.is_unique_violation() {
            return DomainError::Duplicate(unique_message(&constraint));
        }
        if db_err.is_foreign_key_violation() {
            return DomainError::field("non_field_errors", "Referenced object does not exist.");
        }
        if db_err.is_check_violation() {
            return DomainError::field(
                "non_field_errors",
                format!("Value rejected by constraint {}", constraint),
            );
        }
    }

    error!("Database error {}: {}", context, err);
    DomainError::DatabaseError(err.to_string())
}

fn unique_message(constraint: &str) -> String {
    match constraint {
        "carts_user_menuitem_key" => "The fields user, menuitem must make a unique set.".to_string(),
        "order_items_order_menuitem_key" => {
            "The fields order, menuitem must make a unique set.".to_string()
        }
        "menu_items_title_price_category_key" => {
            "The fields title, price, category must make a unique set.".to_string()
        }
        "auth_user_username_key" => "A user with that username already exists.".to_string(),
        other => format!("Duplicate value violates {}", other),
    }
}
