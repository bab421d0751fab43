use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Join entity: one row per (user, plan) pair, kept unique by the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn insert(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> Result<Favorite, sqlx::Error> {
    sqlx::query_as::<_, Favorite>(
        r#"
        INSERT INTO favorites (user_id, plan_id)
        VALUES ($1, $2)
        RETURNING id, user_id, plan_id, created_at
        "#,
    )
    .bind(user_id)
    .bind(plan_id)
    .fetch_one(db)
    .await
}

pub async fn delete(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND plan_id = $2")
        .bind(user_id)
        .bind(plan_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Favorite>> {
    let rows = sqlx::query_as::<_, Favorite>(
        r#"
        SELECT id, user_id, plan_id, created_at
        FROM favorites
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
