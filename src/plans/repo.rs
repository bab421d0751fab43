use crate::plans::tree::PlanTree;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "plan_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Active,
    Done,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "DONE" => Ok(Self::Done),
            _ => Err("must be one of ACTIVE, DONE".into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub status: PlanStatus,
    pub plan_json: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MealPlan {
    /// Typed view of the stored tree; a malformed column degrades to an
    /// empty tree rather than an error.
    pub fn tree(&self) -> PlanTree {
        serde_json::from_value(self.plan_json.clone()).unwrap_or_default()
    }
}

pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    name: &str,
    tree: &PlanTree,
) -> anyhow::Result<MealPlan> {
    let plan_json = serde_json::to_value(tree)?;
    let row = sqlx::query_as::<_, MealPlan>(
        r#"
        INSERT INTO meal_plans (user_id, name, plan_json)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, name, status, plan_json, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(plan_json)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    status: Option<PlanStatus>,
) -> anyhow::Result<Vec<MealPlan>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, MealPlan>(
                r#"
                SELECT id, user_id, name, status, plan_json, created_at, updated_at
                FROM meal_plans
                WHERE user_id = $1 AND status = $2
                ORDER BY created_at DESC
                "#,
            )
            .bind(user_id)
            .bind(status)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, MealPlan>(
                r#"
                SELECT id, user_id, name, status, plan_json, created_at, updated_at
                FROM meal_plans
                WHERE user_id = $1
                ORDER BY created_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(db)
            .await?
        }
    };
    Ok(rows)
}

pub async fn find_owned(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<Option<MealPlan>> {
    let row = sqlx::query_as::<_, MealPlan>(
        r#"
        SELECT id, user_id, name, status, plan_json, created_at, updated_at
        FROM meal_plans
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    name: Option<&str>,
    status: Option<PlanStatus>,
) -> anyhow::Result<Option<MealPlan>> {
    let row = sqlx::query_as::<_, MealPlan>(
        r#"
        UPDATE meal_plans
        SET name = COALESCE($3, name),
            status = COALESCE($4, status),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, status, plan_json, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(status)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_the_fixed_value_set() {
        assert_eq!("ACTIVE".parse::<PlanStatus>().unwrap(), PlanStatus::Active);
        assert_eq!("DONE".parse::<PlanStatus>().unwrap(), PlanStatus::Done);
        assert!("active".parse::<PlanStatus>().is_err());
        assert!("ARCHIVED".parse::<PlanStatus>().is_err());
    }
}
