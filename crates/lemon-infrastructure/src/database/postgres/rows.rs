//! Internal row types for SQLx mapping

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use lemon_core::domain::{
    CartLine, Category, MenuItem, MenuItemRef, OrderItem, OrderStatus, User, UserRef,
};

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_superuser: row.is_superuser,
            date_joined: row.date_joined,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRefRow {
    pub id: i32,
    pub username: String,
}

impl From<UserRefRow> for UserRef {
    fn from(row: UserRefRow) -> Self {
        UserRef {
            id: row.id,
            username: row.username,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CategoryRow {
    pub id: i32,
    pub slug: String,
    pub title: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            slug: row.slug,
            title: row.title,
        }
    }
}

/// Menu item joined with its category.
#[derive(Debug, FromRow)]
pub(crate) struct MenuItemRow {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub featured: bool,
    pub category_id: i32,
    pub category_slug: String,
    pub category_title: String,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            title: row.title,
            price: row.price,
            featured: row.featured,
            category: Category {
                id: row.category_id,
                slug: row.category_slug,
                title: row.category_title,
            },
        }
    }
}

/// Cart row joined with its user and menu item.
#[derive(Debug, FromRow)]
pub(crate) struct CartLineRow {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub menuitem_id: i32,
    pub menuitem_title: String,
    pub menuitem_price: Decimal,
    pub quantity: i16,
    pub unit_price: Decimal,
    pub price: Decimal,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        CartLine {
            id: row.id,
            user: UserRef {
                id: row.user_id,
                username: row.username,
            },
            menuitem: MenuItemRef {
                id: row.menuitem_id,
                title: row.menuitem_title,
                price: row.menuitem_price,
            },
            quantity: row.quantity,
            unit_price: row.unit_price,
            price: row.price,
        }
    }
}

/// Order header joined with owner and crew usernames.
#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub delivery_crew_id: Option<i32>,
    pub delivery_crew_username: Option<String>,
    pub status: bool,
    pub total: Decimal,
    pub date: NaiveDate,
}

impl OrderRow {
    pub fn crew(&self) -> Option<UserRef> {
        match (self.delivery_crew_id, &self.delivery_crew_username) {
            (Some(id), Some(username)) => Some(UserRef {
                id,
                username: username.clone(),
            }),
            _ => None,
        }
    }

    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_flag(self.status)
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub menuitem_id: i32,
    pub menuitem_title: String,
    pub menuitem_price: Decimal,
    pub quantity: i16,
    pub unit_price: Decimal,
    pub price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            menuitem: MenuItemRef {
                id: row.menuitem_id,
                title: row.menuitem_title,
                price: row.menuitem_price,
            },
            quantity: row.quantity,
            unit_price: row.unit_price,
            price: row.price,
        }
    }
}
