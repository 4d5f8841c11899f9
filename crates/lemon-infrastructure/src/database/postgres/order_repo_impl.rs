// ============================================================================
// Lemon Infrastructure - PostgreSQL Order Repository
// File: crates/lemon-infrastructure/src/database/postgres/order_repo_impl.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use lemon_core::access::OrderScope;
use lemon_core::domain::{CartLine, Order, OrderChanges, OrderDraft, OrderItem};
use lemon_core::error::DomainError;
use lemon_core::integrity::Table;
use lemon_core::query::{like_pattern, OrderQuery};
use lemon_core::repositories::OrderRepository;

use super::cart_repo_impl::CART_LINE_COLUMNS;
use super::rows::{CartLineRow, OrderItemRow, OrderRow};
use crate::database::delete_plan::delete_with_policy;
use crate::database::error::db_error;

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.user_id, u.username,
           o.delivery_crew_id, d.username AS delivery_crew_username,
           o.status, o.total, o.date
    FROM orders o
    JOIN auth_user u ON u.id = o.user_id
    LEFT JOIN auth_user d ON d.id = o.delivery_crew_id
"#;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the items of every order in `rows` with one query.
    async fn hydrate(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT oi.id, oi.order_id, oi.menuitem_id,
                   m.title AS menuitem_title, m.price AS menuitem_price,
                   oi.quantity, oi.unit_price, oi.price
            FROM order_items oi
            JOIN menu_items m ON m.id = oi.menuitem_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("loading order items", e))?;

        Ok(assemble(rows, item_rows))
    }
}

fn assemble(rows: Vec<OrderRow>, item_rows: Vec<OrderItemRow>) -> Vec<Order> {
    let mut items: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for item in item_rows {
        items.entry(item.order_id).or_default().push(item.into());
    }

    rows.into_iter()
        .map(|row| Order {
            id: row.id,
            user: lemon_core::domain::UserRef {
                id: row.user_id,
                username: row.username.clone(),
            },
            delivery_crew: row.crew(),
            status: row.status(),
            total: row.total,
            date: row.date,
            order_items: items.remove(&row.id).unwrap_or_default(),
        })
        .collect()
}

/// Delete exactly the cart lines copied into the order. Lines committed after
/// the lock was taken stay in the cart.
async fn drain_cart_lines(conn: &mut PgConnection, ids: &[i32]) -> Result<u64, DomainError> {
    let result = sqlx::query("DELETE FROM carts WHERE id = ANY($1)")
        .bind(ids)
        .execute(conn)
        .await
        .map_err(|e| db_error("draining cart", e))?;
    Ok(result.rows_affected())
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn list(&self, query: &OrderQuery) -> Result<Vec<Order>, DomainError> {
        let Some((limit, offset)) = query.page.window() else {
            return Ok(Vec::new());
        };

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(ORDER_SELECT);
        builder.push(" WHERE TRUE");
        match query.scope {
            OrderScope::All => {}
            OrderScope::AssignedTo(crew_id) => {
                builder.push(" AND o.delivery_crew_id = ").push_bind(crew_id);
            }
            OrderScope::PlacedBy(user_id) => {
                builder.push(" AND o.user_id = ").push_bind(user_id);
            }
        }
        if let Some(status) = query.status {
            builder.push(" AND o.status = ").push_bind(status.is_delivered());
        }
        if let Some(crew) = &query.delivery_crew {
            builder.push(" AND d.username ILIKE ").push_bind(like_pattern(crew));
        }
        builder.push(" ORDER BY ").push(query.ordering.to_sql("o.id"));
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        debug!("Order listing: {}", builder.sql());
        let rows: Vec<OrderRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing orders", e))?;

        self.hydrate(rows).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{} WHERE o.id = $1", ORDER_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding order", e))?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn place_from_cart(&self, user_id: i32, date: NaiveDate) -> Result<Order, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting order transaction", e))?;

        let cart_rows: Vec<CartLineRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM carts ct
            JOIN auth_user u ON u.id = ct.user_id
            JOIN menu_items m ON m.id = ct.menuitem_id
            WHERE ct.user_id = $1
            ORDER BY ct.id
            FOR UPDATE OF ct
            "#,
            CART_LINE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("locking cart", e))?;

        let locked: Vec<i32> = cart_rows.iter().map(|row| row.id).collect();
        let lines: Vec<CartLine> = cart_rows.into_iter().map(Into::into).collect();
        let draft = OrderDraft::from_cart(user_id, &lines, date)?;

        let order_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (user_id, delivery_crew_id, status, total, date)
            VALUES ($1, NULL, FALSE, $2, $3)
            RETURNING id
            "#,
        )
        .bind(draft.user_id)
        .bind(draft.total)
        .bind(draft.date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("inserting order", e))?;

        let mut items: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO order_items (order_id, menuitem_id, quantity, unit_price, price) ",
        );
        items.push_values(&draft.items, |mut b, item| {
            b.push_bind(order_id)
                .push_bind(item.menuitem_id)
                .push_bind(item.quantity)
                .push_bind(item.unit_price)
                .push_bind(item.price);
        });
        items
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("inserting order items", e))?;

        drain_cart_lines(&mut *tx, &locked).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("committing order", e))?;
        info!(
            "Order {} created for user {} with {} items",
            order_id,
            user_id,
            draft.items.len()
        );

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::InternalError(format!("order {} vanished after commit", order_id)))
    }

    async fn update(&self, id: i32, changes: &OrderChanges) -> Result<Option<Order>, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET delivery_crew_id = COALESCE($1, delivery_crew_id),
                status = COALESCE($2, status)
            WHERE id = $3
            "#,
        )
        .bind(changes.delivery_crew_id)
        .bind(changes.status.map(|status| status.is_delivered()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("updating order", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        delete_with_policy(&self.pool, Table::Orders, id).await
    }
}
