//! Axum route handlers for the generation form, the product/image picker, and generation.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::builder::FormUpdate;
use crate::generation::pipeline::run_generation;
use crate::models::catalog::Product;
use crate::session::SessionView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DialogAction {
    OpenProductPicker,
    Close,
}

#[derive(Debug, Deserialize)]
pub struct PickProductRequest {
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub struct ImageSelectionRequest {
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageUrlRequest {
    pub url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/sessions/:id/form
pub async fn handle_update_form(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<FormUpdate>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.form.apply(update);
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/dialog
pub async fn handle_dialog(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(action): Json<DialogAction>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            match action {
                DialogAction::OpenProductPicker => session.open_product_picker()?,
                DialogAction::Close => session.close_dialog()?,
            }
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/products
///
/// Picks a product from the search results and opens its image step.
pub async fn handle_pick_product(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<PickProductRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.pick_product(request.product)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/products/images
pub async fn handle_complete_image_selection(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ImageSelectionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.complete_image_selection(&request.image_urls)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/products/:product_id
///
/// Also drops the images picked from that product.
pub async fn handle_remove_product(
    State(state): State<AppState>,
    Path((session_id, product_id)): Path<(Uuid, String)>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.selection.remove_product(&product_id)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/images
pub async fn handle_add_image(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ImageUrlRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.selection.add_manual_image(&request.url)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/images
pub async fn handle_remove_image(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ImageUrlRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.selection.remove_image(&request.url)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/selection
pub async fn handle_clear_selection(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.clear_selection();
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/generate
///
/// Validates the form, then runs the single `POST /generate` call.
/// Returns the session with the review open, or the error that ended the run.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = run_generation(&state.sessions, state.backend.as_ref(), session_id).await?;
    Ok(Json(view))
}
