//! Role membership port

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::access::Role;
use crate::domain::UserRef;
use crate::error::DomainError;

/// Answers "does user U hold role R" independently of the identity store.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn roles_of(&self, user_id: i32) -> Result<BTreeSet<Role>, DomainError>;
    async fn has_role(&self, user_id: i32, role: Role) -> Result<bool, DomainError>;
    async fn members(&self, role: Role) -> Result<Vec<UserRef>, DomainError>;
    /// Idempotent.
    async fn grant(&self, user_id: i32, role: Role) -> Result<(), DomainError>;
    /// Idempotent.
    async fn revoke(&self, user_id: i32, role: Role) -> Result<(), DomainError>;
}
