use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    receipts::parser::ParsedReceipt,
    state::AppState,
};

pub fn receipt_routes() -> Router<AppState> {
    Router::new()
        .route("/receipts/parse", post(parse_receipt))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

/// POST /receipts/parse (multipart, field "file")
#[instrument(skip(state, mp))]
pub async fn parse_receipt(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> Result<Json<ParsedReceipt>, ApiError> {
    let mut upload = None;
    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::field("file", e.to_string()))?;
            upload = Some((data, content_type));
            break;
        }
    }

    let (data, content_type) = upload.ok_or_else(|| ApiError::field("file", "is required"))?;
    let receipt = state.receipts.parse(data, &content_type).await?;
    info!(user_id = %user_id, items = receipt.items.len(), "receipt parsed");
    Ok(Json(receipt))
}
