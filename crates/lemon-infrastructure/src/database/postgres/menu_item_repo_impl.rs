// ============================================================================
// Lemon Infrastructure - PostgreSQL Menu Item Repository
// File: crates/lemon-infrastructure/src/database/postgres/menu_item_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use lemon_core::domain::{MenuItem, MenuItemInput};
use lemon_core::error::DomainError;
use lemon_core::integrity::Table;
use lemon_core::query::{like_pattern, MenuItemQuery};
use lemon_core::repositories::MenuItemRepository;

use super::rows::MenuItemRow;
use crate::database::delete_plan::delete_with_policy;
use crate::database::error::db_error;

const MENU_ITEM_COLUMNS: &str = r#"
    m.id, m.title, m.price, m.featured,
    c.id AS category_id, c.slug AS category_slug, c.title AS category_title
"#;

pub struct PgMenuItemRepository {
    pool: PgPool,
}

impl PgMenuItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuItemRepository for PgMenuItemRepository {
    async fn list(&self, query: &MenuItemQuery) -> Result<Vec<MenuItem>, DomainError> {
        let Some((limit, offset)) = query.page.window() else {
            return Ok(Vec::new());
        };

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM menu_items m JOIN categories c ON c.id = m.category_id WHERE TRUE",
            MENU_ITEM_COLUMNS
        ));
        if let Some(category) = &query.category {
            builder.push(" AND c.title ILIKE ").push_bind(like_pattern(category));
        }
        if let Some(to_price) = query.to_price {
            builder.push(" AND m.price <= ").push_bind(to_price);
        }
        if let Some(search) = &query.search {
            builder.push(" AND m.title ILIKE ").push_bind(like_pattern(search));
        }
        builder.push(" ORDER BY ").push(query.ordering.to_sql("m.id"));
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        debug!("Menu item listing: {}", builder.sql());
        let rows: Vec<MenuItemRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing menu items", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<MenuItem>, DomainError> {
        let row: Option<MenuItemRow> = sqlx::query_as(&format!(
            "SELECT {} FROM menu_items m JOIN categories c ON c.id = m.category_id WHERE m.id = $1",
            MENU_ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding menu item", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, input: &MenuItemInput) -> Result<MenuItem, DomainError> {
        let row: MenuItemRow = sqlx::query_as(&format!(
            r#"
            WITH m AS (
                INSERT INTO menu_items (title, price, featured, category_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title, price, featured, category_id
            )
            SELECT {} FROM m JOIN categories c ON c.id = m.category_id
            "#,
            MENU_ITEM_COLUMNS
        ))
        .bind(&input.title)
        .bind(input.price)
        .bind(input.featured)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating menu item", e))?;

        Ok(row.into())
    }

    async fn update(&self, id: i32, input: &MenuItemInput) -> Result<Option<MenuItem>, DomainError> {
        let row: Option<MenuItemRow> = sqlx::query_as(&format!(
            r#"
            WITH m AS (
                UPDATE menu_items
                SET title = $1, price = $2, featured = $3, category_id = $4
                WHERE id = $5
                RETURNING id, title, price, featured, category_id
            )
            SELECT {} FROM m JOIN categories c ON c.id = m.category_id
            "#,
            MENU_ITEM_COLUMNS
        ))
        .bind(&input.title)
        .bind(input.price)
        .bind(input.featured)
        .bind(input.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("updating menu item", e))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        delete_with_policy(&self.pool, Table::MenuItems, id).await
    }

    async fn exists_duplicate(
        &self,
        title: &str,
        price: Decimal,
        category_id: i32,
        exclude_id: Option<i32>,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM menu_items
                WHERE title = $1 AND price = $2 AND category_id = $3
                  AND ($4::INTEGER IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(title)
        .bind(price)
        .bind(category_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("checking menu item uniqueness", e))
    }
}
