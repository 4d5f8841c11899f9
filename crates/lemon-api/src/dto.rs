//! Response and request bodies that differ from the domain entities

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lemon_core::access::Caller;
use lemon_core::domain::{Category, MenuItem, User};

/// Menu item as rendered to clients, with the derived taxed price.
#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub price_after_tax: Decimal,
    pub featured: bool,
    pub category: Category,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            price_after_tax: item.price_after_tax(),
            id: item.id,
            title: item.title,
            price: item.price,
            featured: item.featured,
            category: item.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for RegisteredUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub roles: Vec<&'static str>,
}

impl From<&Caller> for CurrentUser {
    fn from(caller: &Caller) -> Self {
        Self {
            id: caller.user_id,
            username: caller.username.clone(),
            is_superuser: caller.is_superuser,
            roles: caller.roles.iter().map(|role| role.group_name()).collect(),
        }
    }
}

/// Group assignment body.
#[derive(Debug, Default, Deserialize)]
pub struct UsernameRequest {
    #[serde(default)]
    pub username: Option<String>,
}
