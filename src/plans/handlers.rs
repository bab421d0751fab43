use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    plans::{
        dto::{
            AcceptPlanRequest, AcceptPlanResponse, GeneratePlanRequest, PlanListQuery,
            UpdatePlanRequest,
        },
        generator::GenerateSpec,
        reconcile,
        repo::{self, MealPlan, PlanStatus},
        tree::PlanTree,
    },
    state::AppState,
    users::repo::User,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/user/:id/meal-plans", get(list_plans))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans/generate", post(generate_plan))
        .route("/meal-plans/accept", post(accept_plan))
        .route("/meal-plans/:id", patch(update_plan).delete(delete_plan))
}

/// Stateless preview: nothing is persisted, the returned tree has no
/// identity until it is accepted.
#[instrument(skip(state, payload))]
pub async fn generate_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<GeneratePlanRequest>,
) -> Result<Json<PlanTree>, ApiError> {
    auth.assert_owns(payload.user_id)?;
    let errs = payload.validate();
    if !errs.is_empty() {
        return Err(ApiError::validation(errs));
    }

    let user = User::find_by_id(&state.db, payload.user_id)
        .await?
        .ok_or(ApiError::NotFound("user not found"))?;

    let tree = state
        .generator
        .generate(
            &user,
            GenerateSpec {
                duration_days: payload.duration_days,
                meals_per_day: payload.meals_per_day,
            },
        )
        .await?;
    info!(user_id = %user.id, days = tree.days.len(), "plan generated");
    Ok(Json(tree))
}

/// Persists the plan and reconciles the pantry in one transaction, so a
/// failure anywhere leaves both untouched and concurrent accepts cannot
/// lose pantry updates.
#[instrument(skip(state, payload))]
pub async fn accept_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AcceptPlanRequest>,
) -> Result<(StatusCode, Json<AcceptPlanResponse>), ApiError> {
    auth.assert_owns(payload.user_id)?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::field("name", "must not be empty"));
    }

    if !payload.plan.shape_matches_meta() {
        warn!(
            user_id = %payload.user_id,
            days = payload.plan.days.len(),
            duration_days = payload.plan.meta.duration_days,
            "plan shape does not match its meta"
        );
    }

    let totals = reconcile::aggregate_uses(&payload.plan);

    let mut tx = state.db.begin().await?;
    let saved = repo::insert(&mut tx, payload.user_id, payload.name.trim(), &payload.plan).await?;
    let pantry = reconcile::apply(&mut tx, payload.user_id, &totals).await?;
    tx.commit().await?;

    info!(
        user_id = %payload.user_id,
        plan_id = %saved.id,
        adjusted = pantry.adjusted.len(),
        created = pantry.created.len(),
        skipped = pantry.skipped.len(),
        "plan accepted, pantry updated"
    );
    Ok((
        StatusCode::CREATED,
        Json(AcceptPlanResponse {
            saved_plan: saved,
            pantry,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(q): Query<PlanListQuery>,
) -> Result<Json<Vec<MealPlan>>, ApiError> {
    auth.assert_owns(user_id)?;
    let status = match q.status.as_deref() {
        Some(s) => Some(
            s.parse::<PlanStatus>()
                .map_err(|msg| ApiError::field("status", msg))?,
        ),
        None => None,
    };
    let plans = repo::list_by_user(&state.db, user_id, status).await?;
    Ok(Json(plans))
}

/// Renames and/or marks done. The only legal status transition is
/// ACTIVE -> DONE; a done plan stays done.
#[instrument(skip(state, payload))]
pub async fn update_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<MealPlan>, ApiError> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::field("name", "must not be empty"));
        }
    }
    let status = match payload.status.as_deref() {
        Some(s) => Some(
            s.parse::<PlanStatus>()
                .map_err(|msg| ApiError::field("status", msg))?,
        ),
        None => None,
    };

    let current = repo::find_owned(&state.db, id, user_id)
        .await?
        .ok_or(ApiError::NotFound("meal plan not found"))?;

    if let Some(next) = status {
        let legal = current.status == PlanStatus::Active && next == PlanStatus::Done;
        if next != current.status && !legal {
            return Err(ApiError::field("status", "only ACTIVE plans can be marked DONE"));
        }
    }

    let updated = repo::update(
        &state.db,
        id,
        user_id,
        payload.name.as_deref().map(str::trim),
        status,
    )
    .await?
    .ok_or(ApiError::NotFound("meal plan not found"))?;

    info!(user_id = %user_id, plan_id = %id, status = ?updated.status, "plan updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete(&state.db, id, user_id).await? {
        info!(user_id = %user_id, plan_id = %id, "plan deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("meal plan not found"))
    }
}
