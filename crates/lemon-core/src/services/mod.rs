//! Domain services (business logic)

pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod order_service;
pub mod role_service;

use std::sync::Arc;

use lemon_security::JwtService;

pub use auth_service::AuthService;
pub use cart_service::CartService;
pub use catalog_service::CatalogService;
pub use order_service::OrderService;
pub use role_service::RoleService;

use crate::query::PageLimits;
use crate::repositories::Repositories;

/// Every service, wired over one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
    pub roles: Arc<RoleService>,
    pub cart: Arc<CartService>,
    pub orders: Arc<OrderService>,
}

impl Services {
    pub fn new(repos: Repositories, jwt: JwtService, limits: PageLimits) -> Self {
        Self {
            auth: Arc::new(AuthService::new(repos.users.clone(), repos.roles.clone(), jwt)),
            catalog: Arc::new(CatalogService::new(
                repos.categories.clone(),
                repos.menu_items.clone(),
                limits,
            )),
            roles: Arc::new(RoleService::new(repos.users.clone(), repos.roles.clone())),
            cart: Arc::new(CartService::new(repos.carts.clone(), repos.menu_items.clone())),
            orders: Arc::new(OrderService::new(repos.orders, repos.users, repos.roles, limits)),
        }
    }
}
