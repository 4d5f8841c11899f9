//! # Lemon Core - Domain Module
//! 
//! Domain entities for the ordering backend.

pub mod money;
pub mod user;
pub mod category;
pub mod menu_item;
pub mod cart;
pub mod order;

// Re-export all entities and enums
pub use user::{Credentials, NewUser, Registration, User, UserRef};
pub use category::{Category, NewCategory};
pub use menu_item::{MenuItem, MenuItemInput, MenuItemPatch, MenuItemRef};
pub use cart::{AddToCart, CartLine, NewCartLine};
pub use order::{
    Order, OrderChanges, OrderDraft, OrderItem, OrderItemDraft, OrderStatus, OrderUpdate,
    StatusPatch,
};
