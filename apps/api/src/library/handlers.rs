//! Axum route handlers for the ad library.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::library::{self, LibraryEntry, SaveOptions, SaveOutcome};
use crate::models::library::{AdLibraryItem, AdStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub shop_id: String,
    pub status: Option<AdStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub shop_id: String,
    pub status: AdStatus,
    /// Status the library view last showed for the ad, if known.
    #[serde(default)]
    pub current_status: Option<AdStatus>,
}

/// POST /api/v1/sessions/:id/variants/:variant_id/save
///
/// Saves the variant as a draft, optionally publishing it too.
/// A failed publish still answers 200 with `outcome: "partially_failed"`.
pub async fn handle_save_variant(
    State(state): State<AppState>,
    Path((session_id, variant_id)): Path<(Uuid, String)>,
    Json(options): Json<SaveOptions>,
) -> Result<Json<SaveOutcome>, AppError> {
    let outcome = library::select_variant(
        &state.sessions,
        state.backend.as_ref(),
        session_id,
        &variant_id,
        options,
    )
    .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/library?shop_id=&status=
pub async fn handle_list_ads(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<LibraryEntry>>, AppError> {
    if params.shop_id.trim().is_empty() {
        return Err(AppError::Validation("shop_id cannot be empty".to_string()));
    }
    let entries = library::list(state.backend.as_ref(), &params.shop_id, params.status).await?;
    Ok(Json(entries))
}

/// PATCH /api/v1/library/:ad_id/status
pub async fn handle_change_status(
    State(state): State<AppState>,
    Path(ad_id): Path<String>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<AdLibraryItem>, AppError> {
    let item = library::change_status(
        state.backend.as_ref(),
        &request.shop_id,
        &ad_id,
        request.current_status,
        request.status,
    )
    .await?;
    Ok(Json(item))
}
