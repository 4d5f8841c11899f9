//! User repository trait (port)

use async_trait::async_trait;

use crate::domain::{NewUser, User};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    /// Fails with `Duplicate` when the username is taken.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
}
