use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::{search, SearchResults};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub limit: Option<u32>,
}

/// GET /api/v1/sessions/:id/products/search?query=&limit=
///
/// Debounced: only the latest query within the window reaches the catalog.
/// Earlier calls answer `{"superseded": true}`.
pub async fn handle_search_products(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, AppError> {
    let results = search(
        &state.sessions,
        state.backend.as_ref(),
        session_id,
        &params.query,
        params.limit,
    )
    .await?;
    Ok(Json(results))
}
