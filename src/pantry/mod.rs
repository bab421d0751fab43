use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod low_stock;
pub mod repo;
pub mod units;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
