use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::platform::{AdAccount, Campaign};
use crate::platforms::{self, TargetUpdate};
use crate::session::SessionView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CampaignParams {
    #[serde(default)]
    pub ad_account_id: String,
}

/// GET /api/v1/platforms/ad-accounts
pub async fn handle_ad_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdAccount>>, AppError> {
    let accounts = platforms::ad_accounts(state.backend.as_ref()).await?;
    Ok(Json(accounts))
}

/// GET /api/v1/platforms/campaigns?ad_account_id=
pub async fn handle_campaigns(
    State(state): State<AppState>,
    Query(params): Query<CampaignParams>,
) -> Result<Json<Vec<Campaign>>, AppError> {
    let campaigns = platforms::campaigns(state.backend.as_ref(), &params.ad_account_id).await?;
    Ok(Json(campaigns))
}

/// PUT /api/v1/sessions/:id/cross-post
///
/// Chooses the ad account and campaign used when a saved ad is also published.
pub async fn handle_set_cross_post_target(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<TargetUpdate>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(session_id, |session| {
            session.cross_post.apply(update)?;
            Ok(session.view())
        })
        .await?;
    Ok(Json(view))
}
