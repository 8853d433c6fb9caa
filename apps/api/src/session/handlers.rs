//! Axum route handlers for session lifecycle.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::SessionView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub shop_id: String,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let shop_id = request.shop_id.trim();
    if shop_id.is_empty() {
        return Err(AppError::Validation("shop_id cannot be empty".to_string()));
    }
    let view = state
        .sessions
        .create(
            shop_id,
            Duration::from_millis(state.config.search_debounce_ms),
        )
        .await;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.view(session_id).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id/banner
pub async fn handle_dismiss_banner(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.banner = None;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}
