//! Menu item entity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::category::Category;
use super::money::{check_amount, to_money, TAX_RATE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub featured: bool,
    pub category: Category,
}

impl MenuItem {
    pub fn price_after_tax(&self) -> Decimal {
        to_money(self.price * TAX_RATE)
    }
}

/// The `{id, title, price}` view embedded in cart lines and order items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemRef {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
}

/// Full write payload, used by create and PUT.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct MenuItemInput {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[serde(default)]
    pub featured: bool,

    pub category_id: i32,
}

/// Partial write payload, used by PATCH.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MenuItemPatch {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,

    pub featured: Option<bool>,

    pub category_id: Option<i32>,
}

impl MenuItemPatch {
    /// Fills every absent field from the stored item.
    pub fn merge_into(self, current: &MenuItem) -> MenuItemInput {
        MenuItemInput {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            price: self.price.unwrap_or(current.price),
            featured: self.featured.unwrap_or(current.featured),
            category_id: self.category_id.unwrap_or(current.category.id),
        }
    }
}

pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    check_amount("Price", *price).map_err(|message| {
        let mut err = ValidationError::new("price");
        err.message = Some(message.into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: Decimal) -> MenuItem {
        MenuItem {
            id: 1,
            title: "Greek Salad".to_string(),
            price,
            featured: false,
            category: Category {
                id: 3,
                slug: "salads".to_string(),
                title: "Salads".to_string(),
            },
        }
    }

    fn input(price: Decimal) -> MenuItemInput {
        MenuItemInput {
            title: "Bruschetta".to_string(),
            price,
            featured: true,
            category_id: 1,
        }
    }

    #[test]
    fn test_price_below_minimum_rejected() {
        let errors = input(Decimal::new(199, 2)).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
        assert!(input(Decimal::ZERO).validate().is_err());
        assert!(input(Decimal::new(-5, 0)).validate().is_err());
    }

    #[test]
    fn test_price_at_minimum_accepted() {
        assert!(input(Decimal::TWO).validate().is_ok());
    }

    #[test]
    fn test_patch_price_validated_only_when_present() {
        assert!(MenuItemPatch::default().validate().is_ok());
        let patch = MenuItemPatch {
            price: Some(Decimal::ONE),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_merge_keeps_untouched_fields() {
        let current = item(Decimal::new(1250, 2));
        let merged = MenuItemPatch {
            featured: Some(true),
            ..Default::default()
        }
        .merge_into(&current);
        assert_eq!(merged.title, "Greek Salad");
        assert_eq!(merged.price, Decimal::new(1250, 2));
        assert!(merged.featured);
        assert_eq!(merged.category_id, 3);
    }

    #[test]
    fn test_price_after_tax() {
        assert_eq!(item(Decimal::new(500, 2)).price_after_tax().to_string(), "5.60");
        assert_eq!(item(Decimal::new(1299, 2)).price_after_tax().to_string(), "14.55");
    }
}
