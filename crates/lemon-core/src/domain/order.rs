//! Order and order item entities

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cart::CartLine;
use super::menu_item::MenuItemRef;
use super::money::{check_amount, to_money};
use super::user::UserRef;
use crate::error::DomainError;

/// Binary delivery flag, stored as a boolean column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
}

impl OrderStatus {
    pub fn from_flag(delivered: bool) -> Self {
        if delivered {
            OrderStatus::Delivered
        } else {
            OrderStatus::Pending
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Accepts the spellings clients send in bodies and query strings:
    /// `0`/`1`, `true`/`false` and the display names, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "delivered" => Some(OrderStatus::Delivered),
            "0" | "false" | "pending" => Some(OrderStatus::Pending),
            _ => None,
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Number(i64),
            Text(String),
        }

        let status = match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => Some(OrderStatus::from_flag(flag)),
            Raw::Number(0) => Some(OrderStatus::Pending),
            Raw::Number(1) => Some(OrderStatus::Delivered),
            Raw::Number(_) => None,
            Raw::Text(text) => OrderStatus::parse(&text),
        };
        status.ok_or_else(|| {
            serde::de::Error::custom("status must be one of 0, 1, true, false, Pending, Delivered")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i32,
    pub menuitem: MenuItemRef,
    pub quantity: i16,
    pub unit_price: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub user: UserRef,
    pub delivery_crew: Option<UserRef>,
    pub status: OrderStatus,
    pub total: Decimal,
    pub date: NaiveDate,
    pub order_items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDraft {
    pub menuitem_id: i32,
    pub quantity: i16,
    pub unit_price: Decimal,
    pub price: Decimal,
}

/// An order computed from a cart, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub user_id: i32,
    pub total: Decimal,
    pub date: NaiveDate,
    pub items: Vec<OrderItemDraft>,
}

impl OrderDraft {
    /// One item per cart line; the total is the exact sum of line prices.
    pub fn from_cart(user_id: i32, lines: &[CartLine], date: NaiveDate) -> Result<Self, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::CartEmpty);
        }

        let items: Vec<OrderItemDraft> = lines
            .iter()
            .map(|line| OrderItemDraft {
                menuitem_id: line.menuitem.id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                price: line.price,
            })
            .collect();

        let total = to_money(items.iter().map(|item| item.price).sum());
        check_amount("Total", total).map_err(|message| DomainError::field("total", message))?;

        Ok(Self {
            user_id,
            total,
            date,
            items,
        })
    }
}

/// Full update (PUT) payload. Only managers may send it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub crew_id: Option<i32>,
    pub status: Option<OrderStatus>,
}

/// Partial update (PATCH) payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPatch {
    pub status: Option<OrderStatus>,
}

/// Column changes handed to the repository once checks have passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub delivery_crew_id: Option<i32>,
    pub status: Option<OrderStatus>,
}
