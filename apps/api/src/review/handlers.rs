//! Axum route handlers for the variant review.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::review::variants::VariantField;
use crate::review::ReviewMode;
use crate::session::SessionView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EditFieldRequest {
    pub field: VariantField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: ReviewMode,
}

/// PATCH /api/v1/sessions/:id/variants/:variant_id
///
/// Overrides one field of a variant. Over-limit text is accepted; the counter flags it.
pub async fn handle_edit_variant(
    State(state): State<AppState>,
    Path((session_id, variant_id)): Path<(Uuid, String)>,
    Json(request): Json<EditFieldRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session
                .review_mut()?
                .edit(&variant_id, request.field, request.value)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:id/review/mode
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.review_mut()?.set_mode(request.mode)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/review/compare/:variant_id
pub async fn handle_select_for_compare(
    State(state): State<AppState>,
    Path((session_id, variant_id)): Path<(Uuid, String)>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.review_mut()?.select_for_compare(&variant_id)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/review
///
/// Closes the review without saving. The edited variants are discarded.
pub async fn handle_close_review(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.close_review()?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}
