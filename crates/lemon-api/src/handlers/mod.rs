//! HTTP handlers, one module per resource

pub mod auth;
pub mod cart;
pub mod categories;
pub mod groups;
pub mod health;
pub mod menu_items;
pub mod orders;
