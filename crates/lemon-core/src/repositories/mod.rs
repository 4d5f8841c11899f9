//! Repository traits (ports)

pub mod cart_repository;
pub mod category_repository;
pub mod menu_item_repository;
pub mod order_repository;
pub mod role_directory;
pub mod user_repository;

use std::sync::Arc;

pub use cart_repository::CartRepository;
pub use category_repository::CategoryRepository;
pub use menu_item_repository::MenuItemRepository;
pub use order_repository::OrderRepository;
pub use role_directory::RoleDirectory;
pub use user_repository::UserRepository;

#[cfg(any(test, feature = "mocks"))]
pub use cart_repository::MockCartRepository;
#[cfg(any(test, feature = "mocks"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "mocks"))]
pub use menu_item_repository::MockMenuItemRepository;
#[cfg(any(test, feature = "mocks"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "mocks"))]
pub use role_directory::MockRoleDirectory;
#[cfg(any(test, feature = "mocks"))]
pub use user_repository::MockUserRepository;

/// Every port, as handed to the services at start-up.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleDirectory>,
    pub categories: Arc<dyn CategoryRepository>,
    pub menu_items: Arc<dyn MenuItemRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub orders: Arc<dyn OrderRepository>,
}
