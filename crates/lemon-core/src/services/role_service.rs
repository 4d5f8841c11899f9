//! Manager and Delivery Crew membership administration

use std::sync::Arc;

use tracing::{info, warn};

use crate::access::{Caller, Role};
use crate::domain::UserRef;
use crate::error::DomainError;
use crate::repositories::{RoleDirectory, UserRepository};

pub struct RoleService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleDirectory>,
}

impl RoleService {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleDirectory>) -> Self {
        Self { users, roles }
    }

    pub async fn members(&self, caller: &Caller, role: Role) -> Result<Vec<UserRef>, DomainError> {
        require_role_admin(caller)?;
        self.roles.members(role).await
    }

    /// Add the user named `username` to `role`.
    pub async fn assign(&self, caller: &Caller, role: Role, username: Option<&str>) -> Result<UserRef, DomainError> {
        require_role_admin(caller)?;
        let username = username
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DomainError::field("username", "Username is required"))?;

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;
        self.roles.grant(user.id, role).await?;

        info!("{} added to {} by {}", user.username, role.group_name(), caller.username);
        Ok(user.to_ref())
    }

    pub async fn remove(&self, caller: &Caller, role: Role, user_id: i32) -> Result<UserRef, DomainError> {
        require_role_admin(caller)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;
        self.roles.revoke(user.id, role).await?;

        info!("{} removed from {} by {}", user.username, role.group_name(), caller.username);
        Ok(user.to_ref())
    }
}

fn require_role_admin(caller: &Caller) -> Result<(), DomainError> {
    if caller.can_administer_roles() {
        Ok(())
    } else {
        warn!("Role administration refused for {}", caller.username);
        Err(DomainError::Forbidden)
    }
}
