use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod parser;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::receipt_routes())
}
