// ============================================================================
// Lemon Core - Catalog Service
// File: crates/lemon-core/src/services/catalog_service.rs
// ============================================================================
//! Categories and menu items

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::access::Caller;
use crate::domain::money::to_money;
use crate::domain::{Category, MenuItem, MenuItemInput, MenuItemPatch, NewCategory};
use crate::error::DomainError;
use crate::query::{MenuItemParams, MenuItemQuery, PageLimits};
use crate::repositories::{CategoryRepository, MenuItemRepository};

pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    menu_items: Arc<dyn MenuItemRepository>,
    limits: PageLimits,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        menu_items: Arc<dyn MenuItemRepository>,
        limits: PageLimits,
    ) -> Self {
        Self {
            categories,
            menu_items,
            limits,
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.categories.list().await
    }

    pub async fn get_category(&self, id: i32) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    /// Open to every authenticated caller.
    pub async fn create_category(&self, category: NewCategory) -> Result<Category, DomainError> {
        let category = category.trimmed();
        category.validate()?;
        let created = self.categories.create(&category).await?;
        info!("Created category {} ({})", created.slug, created.id);
        Ok(created)
    }

    pub async fn delete_category(&self, caller: &Caller, id: i32) -> Result<(), DomainError> {
        require_catalog_admin(caller)?;
        if !self.categories.delete(id).await? {
            return Err(DomainError::not_found("Category", id));
        }
        info!("Category {} deleted by {}", id, caller.username);
        Ok(())
    }

    pub async fn list_menu_items(&self, params: &MenuItemParams) -> Result<Vec<MenuItem>, DomainError> {
        let query = MenuItemQuery::parse(params, self.limits)?;
        self.menu_items.list(&query).await
    }

    pub async fn get_menu_item(&self, id: i32) -> Result<MenuItem, DomainError> {
        self.menu_items
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("MenuItem", id))
    }

    pub async fn create_menu_item(&self, caller: &Caller, input: MenuItemInput) -> Result<MenuItem, DomainError> {
        require_catalog_admin(caller)?;
        let input = self.checked(input, None).await?;
        let item = self.menu_items.create(&input).await?;
        info!("Menu item {} ({}) created by {}", item.title, item.id, caller.username);
        Ok(item)
    }

    /// Full replacement (PUT).
    pub async fn update_menu_item(
        &self,
        caller: &Caller,
        id: i32,
        input: MenuItemInput,
    ) -> Result<MenuItem, DomainError> {
        require_catalog_admin(caller)?;
        self.get_menu_item(id).await?;
        self.store(id, input).await
    }

    /// Partial update (PATCH). Absent fields keep their stored values.
    pub async fn patch_menu_item(
        &self,
        caller: &Caller,
        id: i32,
        patch: MenuItemPatch,
    ) -> Result<MenuItem, DomainError> {
        require_catalog_admin(caller)?;
        patch.validate()?;
        let current = self.get_menu_item(id).await?;
        self.store(id, patch.merge_into(&current)).await
    }

    pub async fn delete_menu_item(&self, caller: &Caller, id: i32) -> Result<(), DomainError> {
        require_catalog_admin(caller)?;
        if !self.menu_items.delete(id).await? {
            return Err(DomainError::not_found("MenuItem", id));
        }
        info!("Menu item {} deleted by {}", id, caller.username);
        Ok(())
    }

    async fn store(&self, id: i32, input: MenuItemInput) -> Result<MenuItem, DomainError> {
        let input = self.checked(input, Some(id)).await?;
        self.menu_items
            .update(id, &input)
            .await?
            .ok_or_else(|| DomainError::not_found("MenuItem", id))
    }

    /// Field rules, category existence and the (title, price, category)
    /// uniqueness rule. Returns the input with its price normalised to cents.
    async fn checked(&self, input: MenuItemInput, exclude_id: Option<i32>) -> Result<MenuItemInput, DomainError> {
        let mut input = MenuItemInput {
            title: input.title.trim().to_string(),
            ..input
        };
        input.validate()?;
        input.price = to_money(input.price);

        if self.categories.find_by_id(input.category_id).await?.is_none() {
            return Err(DomainError::field(
                "category_id",
                format!("Invalid pk \"{}\" - object does not exist.", input.category_id),
            ));
        }

        if self
            .menu_items
            .exists_duplicate(&input.title, input.price, input.category_id, exclude_id)
            .await?
        {
            return Err(DomainError::field(
                "non_field_errors",
                "The fields title, price, category must make a unique set.",
            ));
        }
        Ok(input)
    }
}

fn require_catalog_admin(caller: &Caller) -> Result<(), DomainError> {
    if caller.can_manage_catalog() {
        Ok(())
    } else {
        warn!("Catalog write refused for {}", caller.username);
        Err(DomainError::Forbidden)
    }
}
