use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    pantry::{
        dto::{
            BulkCreateRequest, CreateIngredientRequest, LowStockEntry, LowStockQuery,
            LowStockResponse, UpdateIngredientRequest,
        },
        low_stock, repo,
        repo::Ingredient,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/user/:id/ingredients", get(list_ingredients))
        .route("/user/:id/ingredients/low-stock", get(list_low_stock))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/user/:id/ingredients", post(create_ingredient))
        .route("/user/:id/ingredients/bulk", post(create_ingredients_bulk))
        .route("/ingredients/:id", patch(update_ingredient))
        .route(
            "/user/:id/ingredients/:ingredient_id",
            delete(delete_ingredient),
        )
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    auth.assert_owns(user_id)?;
    let items = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn list_low_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(q): Query<LowStockQuery>,
) -> Result<Json<LowStockResponse>, ApiError> {
    auth.assert_owns(user_id)?;
    let pantry = repo::list_by_user(&state.db, user_id).await?;
    let flagged = low_stock::evaluate(&pantry);

    let total = flagged.len();
    let shown = q.limit.unwrap_or(total).min(total);
    let items = flagged
        .into_iter()
        .take(shown)
        .map(|f| LowStockEntry::from_flagged(f.item, f.normalized))
        .collect();
    Ok(Json(LowStockResponse {
        items,
        remaining: total - shown,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<Ingredient>), ApiError> {
    auth.assert_owns(user_id)?;
    payload.validate().into_result()?;

    let row = repo::create(
        &state.db,
        user_id,
        payload.name.trim(),
        payload.quantity,
        payload.unit.trim(),
    )
    .await?;
    info!(user_id = %user_id, ingredient_id = %row.id, "ingredient created");
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state, payload))]
pub async fn create_ingredients_bulk(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<BulkCreateRequest>,
) -> Result<(StatusCode, Json<Vec<Ingredient>>), ApiError> {
    auth.assert_owns(user_id)?;
    if payload.items.is_empty() {
        return Err(ApiError::field("items", "must not be empty"));
    }
    for item in &payload.items {
        item.validate().into_result()?;
    }

    let items: Vec<(String, f64, String)> = payload
        .items
        .iter()
        .map(|i| (i.name.trim().to_string(), i.quantity, i.unit.trim().to_string()))
        .collect();
    let created = repo::create_many(&state.db, user_id, &items).await?;
    info!(user_id = %user_id, count = created.len(), "ingredients bulk created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, payload))]
pub async fn update_ingredient(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIngredientRequest>,
) -> Result<Json<Ingredient>, ApiError> {
    payload.validate().into_result()?;

    let row = repo::update(
        &state.db,
        id,
        user_id,
        payload.name.as_deref().map(str::trim),
        payload.quantity,
        payload.unit.as_deref().map(str::trim),
    )
    .await?
    .ok_or(ApiError::NotFound("ingredient not found"))?;
    Ok(Json(row))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((user_id, ingredient_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    auth.assert_owns(user_id)?;
    if repo::delete(&state.db, ingredient_id, user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("ingredient not found"))
    }
}
