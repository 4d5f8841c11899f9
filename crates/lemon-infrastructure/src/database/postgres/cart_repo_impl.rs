//! PostgreSQL cart repository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use lemon_core::domain::{CartLine, NewCartLine};
use lemon_core::error::DomainError;
use lemon_core::repositories::CartRepository;

use super::rows::CartLineRow;
use crate::database::error::db_error;

/// Select list shared with order placement; expects aliases `ct`, `u`, `m`.
pub(crate) const CART_LINE_COLUMNS: &str = r#"
    ct.id, ct.user_id, u.username,
    ct.menuitem_id, m.title AS menuitem_title, m.price AS menuitem_price,
    ct.quantity, ct.unit_price, ct.price
"#;

pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<CartLine>, DomainError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM carts ct
            JOIN auth_user u ON u.id = ct.user_id
            JOIN menu_items m ON m.id = ct.menuitem_id
            WHERE ct.user_id = $1
            ORDER BY ct.id
            "#,
            CART_LINE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing cart", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add(&self, line: &NewCartLine) -> Result<CartLine, DomainError> {
        let row: CartLineRow = sqlx::query_as(&format!(
            r#"
            WITH ct AS (
                INSERT INTO carts (user_id, menuitem_id, quantity, unit_price, price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, user_id, menuitem_id, quantity, unit_price, price
            )
            SELECT {}
            FROM ct
            JOIN auth_user u ON u.id = ct.user_id
            JOIN menu_items m ON m.id = ct.menuitem_id
            "#,
            CART_LINE_COLUMNS
        ))
        .bind(line.user_id)
        .bind(line.menuitem_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("adding cart line", e))?;

        Ok(row.into())
    }

    async fn clear(&self, user_id: i32) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("clearing cart", e))?;

        info!("Removed {} cart lines for user {}", result.rows_affected(), user_id);
        Ok(result.rows_affected())
    }
}
