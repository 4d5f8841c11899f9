//! Caller identity and role capability checks.
//!
//! Roles are resolved per request through [`RoleDirectory`](crate::repositories::RoleDirectory),
//! so a revoked membership takes effect on the caller's next request.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use lemon_shared::constants::{
    DELIVERY_CREW_GROUP, MANAGER_GROUP, THROTTLE_SCOPE_CUSTOMER, THROTTLE_SCOPE_DELIVERY,
    THROTTLE_SCOPE_MANAGER,
};

/// Staff roles. Customers are callers with no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
    DeliveryCrew,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Manager, Role::DeliveryCrew];

    /// Group name as stored in `auth_group`.
    pub fn group_name(&self) -> &'static str {
        match self {
            Role::Manager => MANAGER_GROUP,
            Role::DeliveryCrew => DELIVERY_CREW_GROUP,
        }
    }

    /// Path segment under `/groups`.
    pub fn slug(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::DeliveryCrew => "delivery-crew",
        }
    }

    pub fn from_group_name(name: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|role| role.group_name() == name)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|role| role.slug() == slug)
    }
}

/// Which orders a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    AssignedTo(i32),
    PlacedBy(i32),
}

/// The authenticated principal of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub roles: BTreeSet<Role>,
}

impl Caller {
    pub fn new(user_id: i32, username: impl Into<String>, is_superuser: bool, roles: BTreeSet<Role>) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_superuser,
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_manager(&self) -> bool {
        self.has_role(Role::Manager)
    }

    pub fn is_delivery_crew(&self) -> bool {
        self.has_role(Role::DeliveryCrew)
    }

    /// Menu item writes and category deletion.
    pub fn can_manage_catalog(&self) -> bool {
        self.is_manager() || self.is_superuser
    }

    pub fn can_administer_roles(&self) -> bool {
        self.is_manager() || self.is_superuser
    }

    /// Manager wins over DeliveryCrew when a user holds both.
    pub fn order_scope(&self) -> OrderScope {
        if self.is_manager() {
            OrderScope::All
        } else if self.is_delivery_crew() {
            OrderScope::AssignedTo(self.user_id)
        } else {
            OrderScope::PlacedBy(self.user_id)
        }
    }

    pub fn can_view_order(&self, owner_id: i32) -> bool {
        self.is_manager() || self.user_id == owner_id
    }

    pub fn can_set_order_status(&self) -> bool {
        self.is_manager() || self.is_delivery_crew()
    }

    /// Throttle bucket for this caller.
    pub fn throttle_scope(&self) -> &'static str {
        if self.is_manager() {
            THROTTLE_SCOPE_MANAGER
        } else if self.is_delivery_crew() {
            THROTTLE_SCOPE_DELIVERY
        } else {
            THROTTLE_SCOPE_CUSTOMER
        }
    }
}
