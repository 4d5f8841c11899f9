//! Seed rows for the database-backed tests.

use rust_decimal::Decimal;
use sqlx::PgPool;

pub(crate) async fn seed_user(pool: &PgPool, username: &str) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO auth_user (username, password_hash) VALUES ($1, 'not-a-hash') RETURNING id",
    )
    .bind(username)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub(crate) async fn seed_category(pool: &PgPool, slug: &str, title: &str) -> i32 {
    sqlx::query_scalar("INSERT INTO categories (slug, title) VALUES ($1, $2) RETURNING id")
        .bind(slug)
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub(crate) async fn seed_menu_item(pool: &PgPool, title: &str, price: Decimal, category_id: i32) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO menu_items (title, price, category_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(title)
    .bind(price)
    .bind(category_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub(crate) async fn seed_cart_line(
    pool: &PgPool,
    user_id: i32,
    menuitem_id: i32,
    quantity: i16,
    unit_price: Decimal,
) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO carts (user_id, menuitem_id, quantity, unit_price, price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(menuitem_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(unit_price * Decimal::from(quantity))
    .fetch_one(pool)
    .await
    .unwrap()
}

/// `SELECT COUNT(*)` of `table`.
pub(crate) async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
