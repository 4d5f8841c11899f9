//! Menu category entity

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(
        length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 25, message = "Title must be between 1 and 25 characters"))]
    pub title: String,
}

impl NewCategory {
    pub fn trimmed(self) -> Self {
        Self {
            slug: self.slug.trim().to_string(),
            title: self.title.trim().to_string(),
        }
    }
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if slug.chars().all(allowed) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some(
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens".into(),
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_category() {
        let category = NewCategory {
            slug: "main-course_2".to_string(),
            title: "Main Course".to_string(),
        };
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_slug_rejects_spaces() {
        let category = NewCategory {
            slug: "main course".to_string(),
            title: "Main Course".to_string(),
        };
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_title_length() {
        let category = NewCategory {
            slug: "desserts".to_string(),
            title: "D".repeat(26),
        };
        let errors = category.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_trimmed() {
        let category = NewCategory {
            slug: " starters ".to_string(),
            title: " Starters".to_string(),
        }
        .trimmed();
        assert_eq!(category.slug, "starters");
        assert_eq!(category.title, "Starters");
    }
}
