use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    favorites::repo::{self, Favorite},
    plans::repo as plans_repo,
    state::AppState,
};

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/user/:id/favorites", get(list_favorites))
        .route("/meal-plans/:id/favorite", post(favorite_plan))
        .route("/meal-plans/:id/favorite", delete(unfavorite_plan))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfavoriteQuery {
    pub user_id: Uuid,
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Favorite>>, ApiError> {
    auth.assert_owns(user_id)?;
    let favorites = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(favorites))
}

#[instrument(skip(state, payload))]
pub async fn favorite_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    auth.assert_owns(payload.user_id)?;

    plans_repo::find_owned(&state.db, plan_id, payload.user_id)
        .await?
        .ok_or(ApiError::NotFound("meal plan not found"))?;

    let favorite = repo::insert(&state.db, payload.user_id, plan_id)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::Conflict("plan already favorited".into())
            }
            _ => ApiError::Database(e),
        })?;

    info!(user_id = %payload.user_id, plan_id = %plan_id, "plan favorited");
    Ok((StatusCode::CREATED, Json(favorite)))
}

#[instrument(skip(state))]
pub async fn unfavorite_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Query(q): Query<UnfavoriteQuery>,
) -> Result<StatusCode, ApiError> {
    auth.assert_owns(q.user_id)?;
    if repo::delete(&state.db, q.user_id, plan_id).await? {
        info!(user_id = %q.user_id, plan_id = %plan_id, "plan unfavorited");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("favorite not found"))
    }
}
