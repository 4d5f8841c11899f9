//! Cart line entity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::menu_item::{MenuItem, MenuItemRef};
use super::money::{check_amount, to_money};
use super::user::UserRef;
use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: i32,
    pub user: UserRef,
    pub menuitem: MenuItemRef,
    pub quantity: i16,
    pub unit_price: Decimal,
    pub price: Decimal,
}

/// Add-to-cart payload as sent by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddToCart {
    pub menuitem_id: i32,

    #[validate(range(min = 1, message = "Quantity must be greater than 0"))]
    pub quantity: i16,
}

/// Priced cart row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub user_id: i32,
    pub menuitem_id: i32,
    pub quantity: i16,
    pub unit_price: Decimal,
    pub price: Decimal,
}

impl NewCartLine {
    /// Prices `quantity` units of `item` at its current price.
    pub fn priced(user_id: i32, item: &MenuItem, quantity: i16) -> Result<Self, DomainError> {
        if quantity < 1 {
            return Err(DomainError::field("quantity", "Quantity must be greater than 0"));
        }

        let unit_price = to_money(item.price);
        let price = to_money(unit_price * Decimal::from(quantity));
        check_amount("Price", price).map_err(|message| DomainError::field("price", message))?;

        Ok(Self {
            user_id,
            menuitem_id: item.id,
            quantity,
            unit_price,
            price,
        })
    }
}
