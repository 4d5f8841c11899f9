//! PostgreSQL category repository

use async_trait::async_trait;
use sqlx::PgPool;

use lemon_core::domain::{Category, NewCategory};
use lemon_core::error::DomainError;
use lemon_core::integrity::Table;
use lemon_core::repositories::CategoryRepository;

use super::rows::CategoryRow;
use crate::database::delete_plan::delete_with_policy;
use crate::database::error::db_error;

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, slug, title FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing categories", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, slug, title FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding category", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, DomainError> {
        let row: CategoryRow = sqlx::query_as(
            "INSERT INTO categories (slug, title) VALUES ($1, $2) RETURNING id, slug, title",
        )
        .bind(&category.slug)
        .bind(&category.title)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating category", e))?;

        Ok(row.into())
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        delete_with_policy(&self.pool, Table::Categories, id).await
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::database::postgres::fixtures::{count, seed_category, seed_menu_item};

    #[sqlx::test(migrations = "./migrations")]
    async fn test_category_in_use_cannot_be_deleted(pool: PgPool) {
        let desserts = seed_category(&pool, "desserts", "Desserts").await;
        let drinks = seed_category(&pool, "drinks", "Drinks").await;
        seed_menu_item(&pool, "Lemon Cake", Decimal::new(500, 2), desserts).await;
        let repo = PgCategoryRepository::new(pool.clone());

        match repo.delete(desserts).await {
            Err(DomainError::Protected {
                table,
                referenced_by,
            }) => {
                assert_eq!(table, "categories");
                assert_eq!(referenced_by, "menu_items");
            }
            other => panic!("expected protected delete, got {:?}", other),
        }
        assert_eq!(count(&pool, "menu_items").await, 1);
        assert!(repo.find_by_id(desserts).await.unwrap().is_some());

        assert!(repo.delete(drinks).await.unwrap());
        assert!(!repo.delete(drinks).await.unwrap());
    }
}
