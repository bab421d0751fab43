use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod profile;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
