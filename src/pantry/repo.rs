use crate::pantry::low_stock::StockLevel;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

/// Pantry row. Quantity is free-floating; the reconciliation floor keeps it
/// at or above zero.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl StockLevel for Ingredient {
    fn quantity(&self) -> f64 {
        self.quantity
    }
    fn unit(&self) -> &str {
        &self.unit
    }
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Ingredient>> {
    let rows = sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT id, user_id, name, quantity, unit, created_at, updated_at
        FROM ingredients
        WHERE user_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    quantity: f64,
    unit: &str,
) -> anyhow::Result<Ingredient> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        INSERT INTO ingredients (user_id, name, quantity, unit)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, name, quantity, unit, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(quantity)
    .bind(unit)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn create_many(
    db: &PgPool,
    user_id: Uuid,
    items: &[(String, f64, String)],
) -> anyhow::Result<Vec<Ingredient>> {
    let mut tx = db.begin().await?;
    let mut created = Vec::with_capacity(items.len());
    for (name, quantity, unit) in items {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (user_id, name, quantity, unit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, quantity, unit, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(quantity)
        .bind(unit)
        .fetch_one(&mut *tx)
        .await?;
        created.push(row);
    }
    tx.commit().await?;
    Ok(created)
}

/// Partial update; absent fields keep their stored value.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    name: Option<&str>,
    quantity: Option<f64>,
    unit: Option<&str>,
) -> anyhow::Result<Option<Ingredient>> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        UPDATE ingredients
        SET name = COALESCE($3, name),
            quantity = COALESCE($4, quantity),
            unit = COALESCE($5, unit),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, quantity, unit, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(quantity)
    .bind(unit)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM ingredients WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Locks the oldest row matching the (case-insensitive) name for the rest of
/// the surrounding transaction.
pub async fn lock_by_name(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    name: &str,
) -> anyhow::Result<Option<Ingredient>> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT id, user_id, name, quantity, unit, created_at, updated_at
        FROM ingredients
        WHERE user_id = $1 AND lower(name) = lower($2)
        ORDER BY created_at ASC, id ASC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn set_quantity(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    quantity: f64,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE ingredients SET quantity = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(quantity)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn insert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    name: &str,
    quantity: f64,
    unit: &str,
) -> anyhow::Result<Ingredient> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        INSERT INTO ingredients (user_id, name, quantity, unit)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, name, quantity, unit, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(quantity)
    .bind(unit)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}
