//! # Lemon Infrastructure
//! 
//! PostgreSQL implementations of the lemon-core repository traits (adapters).

pub mod database;

use std::sync::Arc;

use sqlx::PgPool;

use lemon_core::repositories::Repositories;

pub use database::{
    create_pool, run_migrations, PgCartRepository, PgCategoryRepository, PgMenuItemRepository,
    PgOrderRepository, PgRoleDirectory, PgUserRepository,
};

/// Wire every PostgreSQL adapter over one pool.
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        roles: Arc::new(PgRoleDirectory::new(pool.clone())),
        categories: Arc::new(PgCategoryRepository::new(pool.clone())),
        menu_items: Arc::new(PgMenuItemRepository::new(pool.clone())),
        carts: Arc::new(PgCartRepository::new(pool.clone())),
        orders: Arc::new(PgOrderRepository::new(pool)),
    }
}
