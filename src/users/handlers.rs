use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{jwt::AuthUser, password::hash_password},
    error::{ApiError, FieldErrors},
    state::AppState,
    users::{
        dto::{CreateUserRequest, PublicUser},
        profile::{FitnessGoal, FitnessLevel, Gender},
        repo::{NewUser, User},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(create_user))
        .route("/user/:id", get(get_user))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    let mut errs = FieldErrors::new();
    if payload.username.is_empty() {
        errs.push("username", "must not be empty");
    }
    if !is_valid_email(&payload.email) {
        errs.push("email", "invalid email");
    }
    if payload.password.len() < 8 {
        errs.push("password", "must be at least 8 characters");
    }
    if let Some(w) = payload.weight {
        if !w.is_finite() || w <= 0.0 {
            errs.push("weight", "must be a positive number");
        }
    }

    let fitness_goal = match payload.fitness_goal.parse::<FitnessGoal>() {
        Ok(g) => Some(g),
        Err(msg) => {
            errs.push("fitnessGoal", msg);
            None
        }
    };
    let gender = match payload.gender.parse::<Gender>() {
        Ok(g) => Some(g),
        Err(msg) => {
            errs.push("gender", msg);
            None
        }
    };
    let fitness_level = match payload.fitness_level.parse::<FitnessLevel>() {
        Ok(l) => Some(l),
        Err(msg) => {
            errs.push("fitnessLevel", msg);
            None
        }
    };
    errs.into_result()?;
    let (fitness_goal, gender, fitness_level) = match (fitness_goal, gender, fitness_level) {
        (Some(g), Some(s), Some(l)) => (g, s, l),
        _ => return Err(ApiError::field("profile", "invalid profile fields")),
    };

    // Ensure username and email are not taken
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("email already registered".into()));
    }
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("username already taken".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        NewUser {
            username: &payload.username,
            email: &payload.email,
            password_hash: &hash,
            weight: payload.weight,
            fitness_goal,
            gender,
            fitness_level,
            favorite_cuisines: &payload.favorite_cuisines,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    auth.assert_owns(id)?;
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user not found"))?;
    Ok(Json(PublicUser::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_matches_plain_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a @b.co"));
    }
}
