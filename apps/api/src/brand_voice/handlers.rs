//! Axum route handlers for the brand voice.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::brand_voice::{self, BrandVoiceView, VoiceTuning};
use crate::errors::AppError;
use crate::session::SessionView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddSampleRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct EditSummaryRequest {
    pub summary: String,
}

/// GET /api/v1/sessions/:id/brand-voice
pub async fn handle_get_brand_voice(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<BrandVoiceView>, AppError> {
    let view = state
        .sessions
        .read(session_id, |session| session.brand_voice.view())
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/brand-voice/samples
///
/// Adds a writing sample. Reaching the sample threshold generates the profile.
pub async fn handle_add_sample(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AddSampleRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = brand_voice::add_sample(
        &state.sessions,
        state.backend.as_ref(),
        session_id,
        &request.text,
        state.config.brand_voice_sample_threshold,
    )
    .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/brand-voice/samples/:sample_id
pub async fn handle_remove_sample(
    State(state): State<AppState>,
    Path((session_id, sample_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.brand_voice.remove_sample(sample_id)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:id/brand-voice/summary
pub async fn handle_edit_summary(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<EditSummaryRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.brand_voice.edit_summary(&request.summary)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:id/brand-voice/tuning
pub async fn handle_set_tuning(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(tuning): Json<VoiceTuning>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.brand_voice.set_tuning(tuning)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/brand-voice/regenerate
pub async fn handle_regenerate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = brand_voice::regenerate(
        &state.sessions,
        state.backend.as_ref(),
        session_id,
        state.config.brand_voice_sample_threshold,
    )
    .await?;
    Ok(Json(view))
}
