//! PostgreSQL repository implementations

pub mod cart_repo_impl;
pub mod category_repo_impl;
pub mod menu_item_repo_impl;
pub mod order_repo_impl;
pub mod role_directory_impl;
pub mod user_repo_impl;

mod rows;

pub use cart_repo_impl::PgCartRepository;
pub use category_repo_impl::PgCategoryRepository;
pub use menu_item_repo_impl::PgMenuItemRepository;
pub use order_repo_impl::PgOrderRepository;
pub use role_directory_impl::PgRoleDirectory;
pub use user_repo_impl::PgUserRepository;

#[cfg(test)]
pub(crate) mod fixtures;
