//! Order repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Order, OrderChanges};
use crate::error::DomainError;
use crate::query::OrderQuery;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn list(&self, query: &OrderQuery) -> Result<Vec<Order>, DomainError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError>;
    /// Drains the user's cart into a new order in one transaction. Fails with
    /// `CartEmpty` when there is nothing to drain.
    async fn place_from_cart(&self, user_id: i32, date: NaiveDate) -> Result<Order, DomainError>;
    async fn update(&self, id: i32, changes: &OrderChanges) -> Result<Option<Order>, DomainError>;
    /// Cascades to the order's items.
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
