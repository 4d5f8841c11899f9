//! Category repository trait (port)

use async_trait::async_trait;

use crate::domain::{Category, NewCategory};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, DomainError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError>;
    async fn create(&self, category: &NewCategory) -> Result<Category, DomainError>;
    /// Returns `false` when no row matched. Fails with `Protected` while menu
    /// items still reference the category.
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
