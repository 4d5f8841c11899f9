// ============================================================================
// Lemon Core - Order Service
// File: crates/lemon-core/src/services/order_service.rs
// ============================================================================
//! Order placement, visibility and fulfilment

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::access::{Caller, Role};
use crate::domain::{Order, OrderChanges, OrderUpdate, StatusPatch};
use crate::error::DomainError;
use crate::query::{OrderParams, OrderQuery, PageLimits};
use crate::repositories::{OrderRepository, RoleDirectory, UserRepository};

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleDirectory>,
    limits: PageLimits,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleDirectory>,
        limits: PageLimits,
    ) -> Self {
        Self {
            orders,
            users,
            roles,
            limits,
        }
    }

    /// Managers see every order, delivery crew the orders assigned to them,
    /// customers their own.
    pub async fn list(&self, caller: &Caller, params: &OrderParams) -> Result<Vec<Order>, DomainError> {
        let query = OrderQuery::parse(caller.order_scope(), params, self.limits)?;
        self.orders.list(&query).await
    }

    /// Turn the caller's cart into an order dated `today`.
    pub async fn place(&self, caller: &Caller, today: NaiveDate) -> Result<Order, DomainError> {
        let order = self.orders.place_from_cart(caller.user_id, today).await?;
        info!(
            "Order {} placed by {}: {} items, total {}",
            order.id,
            caller.username,
            order.order_items.len(),
            order.total
        );
        Ok(order)
    }

    pub async fn get(&self, caller: &Caller, id: i32) -> Result<Order, DomainError> {
        let order = self.find(id).await?;
        if !caller.can_view_order(order.user.id) {
            warn!("{} tried to read order {} of user {}", caller.username, id, order.user.id);
            return Err(DomainError::Forbidden);
        }
        Ok(order)
    }

    /// Manager-only full update: crew assignment and status.
    pub async fn update(&self, caller: &Caller, id: i32, update: OrderUpdate) -> Result<Order, DomainError> {
        if !caller.is_manager() {
            return Err(DomainError::Forbidden);
        }
        self.find(id).await?;

        if let Some(crew_id) = update.crew_id {
            let crew = self
                .users
                .find_by_id(crew_id)
                .await?
                .ok_or_else(|| DomainError::not_found("User", crew_id))?;
            if !self.roles.has_role(crew.id, Role::DeliveryCrew).await? {
                return Err(DomainError::field("crew_id", "User is not in Delivery Crew group"));
            }
        }

        let changes = OrderChanges {
            delivery_crew_id: update.crew_id,
            status: update.status,
        };
        let order = self.apply(id, &changes).await?;
        info!("Order {} updated by {}", id, caller.username);
        Ok(order)
    }

    /// Status-only update for managers and delivery crew.
    pub async fn set_status(&self, caller: &Caller, id: i32, patch: StatusPatch) -> Result<Order, DomainError> {
        if !caller.can_set_order_status() {
            return Err(DomainError::Forbidden);
        }
        let status = patch
            .status
            .ok_or_else(|| DomainError::field("status", "This field is required."))?;
        self.find(id).await?;

        let order = self
            .apply(
                id,
                &OrderChanges {
                    delivery_crew_id: None,
                    status: Some(status),
                },
            )
            .await?;
        info!("Order {} marked {} by {}", id, status.as_str(), caller.username);
        Ok(order)
    }

    pub async fn delete(&self, caller: &Caller, id: i32) -> Result<(), DomainError> {
        if !caller.is_manager() {
            return Err(DomainError::Forbidden);
        }
        if !self.orders.delete(id).await? {
            return Err(DomainError::not_found("Order", id));
        }
        info!("Order {} deleted by {}", id, caller.username);
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<Order, DomainError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", id))
    }

    async fn apply(&self, id: i32, changes: &OrderChanges) -> Result<Order, DomainError> {
        self.orders
            .update(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", id))
    }
}
