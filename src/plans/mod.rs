use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod flow;
pub mod generator;
pub mod handlers;
pub mod preview;
pub mod reconcile;
pub mod repo;
pub mod tree;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
