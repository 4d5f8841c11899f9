//! Per-user shopping cart

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::access::Caller;
use crate::domain::{AddToCart, CartLine, NewCartLine};
use crate::error::DomainError;
use crate::repositories::{CartRepository, MenuItemRepository};

pub struct CartService {
    carts: Arc<dyn CartRepository>,
    menu_items: Arc<dyn MenuItemRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, menu_items: Arc<dyn MenuItemRepository>) -> Self {
        Self { carts, menu_items }
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<CartLine>, DomainError> {
        self.carts.list_for_user(caller.user_id).await
    }

    /// Price the item at its current price and add it as a new line.
    pub async fn add(&self, caller: &Caller, request: AddToCart) -> Result<CartLine, DomainError> {
        request.validate()?;
        let item = self
            .menu_items
            .find_by_id(request.menuitem_id)
            .await?
            .ok_or_else(|| DomainError::not_found("MenuItem", request.menuitem_id))?;

        let line = NewCartLine::priced(caller.user_id, &item, request.quantity)?;
        let added = self.carts.add(&line).await?;
        info!(
            "{} added {} x {} to cart",
            caller.username, added.quantity, added.menuitem.title
        );
        Ok(added)
    }

    pub async fn clear(&self, caller: &Caller) -> Result<u64, DomainError> {
        let removed = self.carts.clear(caller.user_id).await?;
        info!("Cleared {} cart lines for {}", removed, caller.username);
        Ok(removed)
    }
}
