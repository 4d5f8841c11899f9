//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;

mod delete_plan;
mod error;

pub use connection::{create_pool, run_migrations};
pub use postgres::{
    PgCartRepository, PgCategoryRepository, PgMenuItemRepository, PgOrderRepository,
    PgRoleDirectory, PgUserRepository,
};
