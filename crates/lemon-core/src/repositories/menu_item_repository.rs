//! Menu item repository trait (port)

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{MenuItem, MenuItemInput};
use crate::error::DomainError;
use crate::query::MenuItemQuery;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn list(&self, query: &MenuItemQuery) -> Result<Vec<MenuItem>, DomainError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<MenuItem>, DomainError>;
    async fn create(&self, input: &MenuItemInput) -> Result<MenuItem, DomainError>;
    async fn update(&self, id: i32, input: &MenuItemInput) -> Result<Option<MenuItem>, DomainError>;
    /// Cascades to cart lines and order items.
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
    /// Whether another item already has this (title, price, category).
    async fn exists_duplicate(
        &self,
        title: &str,
        price: Decimal,
        category_id: i32,
        exclude_id: Option<i32>,
    ) -> Result<bool, DomainError>;
}
