//! Cart repository trait (port)

use async_trait::async_trait;

use crate::domain::{CartLine, NewCartLine};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<CartLine>, DomainError>;
    /// Fails with `Duplicate` when the user already has a line for the item.
    async fn add(&self, line: &NewCartLine) -> Result<CartLine, DomainError>;
    /// Returns the number of lines removed.
    async fn clear(&self, user_id: i32) -> Result<u64, DomainError>;
}
