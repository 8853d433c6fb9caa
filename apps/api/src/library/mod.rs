//! Ad library: saving a reviewed variant, optional cross-posting, status changes.
//!
//! Flow: resolve variant (overrides first) → `POST /library` as draft →
//!       if requested, `POST /facebook/create-ad` → close the review.
//!
//! A failed cross-post never rolls back the saved draft.

pub mod handlers;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::progress::Progress;
use crate::generation::selection::{ImageOrigin, Selection};
use crate::models::library::{
    AdLibraryItem, AdStatus, CrossPostRequest, MetricRatios, ProductSnapshot, SaveAdRequest,
};
use crate::review::Review;
use crate::session::{Banner, Dialog, PendingOp, Session, SessionStore};
use crate::upstream::StudioBackend;

const SAVE_FALLBACK: &str = "Failed to save ad";
const CROSS_POST_FALLBACK: &str = "Ad saved as a draft, but publishing to Facebook failed";
const PUBLISHED_MESSAGE: &str = "Ad saved and published to Facebook";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveOptions {
    #[serde(default)]
    pub cross_post: bool,
}

/// What happened when a variant was selected.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved {
        ad: AdLibraryItem,
        redirect: String,
    },
    Published {
        ad: AdLibraryItem,
        external_ad_id: String,
        redirect: String,
    },
    /// The draft exists; only the cross-post failed.
    PartiallyFailed {
        ad: AdLibraryItem,
        error: String,
        redirect: String,
    },
}

impl SaveOutcome {
    pub fn redirect(&self) -> &str {
        match self {
            SaveOutcome::Saved { redirect, .. }
            | SaveOutcome::Published { redirect, .. }
            | SaveOutcome::PartiallyFailed { redirect, .. } => redirect,
        }
    }
}

fn edit_path(ad_id: &str) -> String {
    format!("/ads/{ad_id}/edit")
}

fn detail_path(ad_id: &str) -> String {
    format!("/ads/{ad_id}")
}

/// Snapshot of the first selected product, with its first chosen image.
fn product_snapshot(selection: &Selection) -> Option<ProductSnapshot> {
    let product = selection.products.first()?;
    let image_url = selection
        .images
        .iter()
        .find(|i| matches!(&i.origin, ImageOrigin::Product(id) if *id == product.id))
        .map(|i| i.url.clone())
        .or_else(|| product.images.first().map(|i| i.url.clone()));
    Some(ProductSnapshot {
        id: product.id.clone(),
        title: product.title.clone(),
        price: product.price,
        image_url,
    })
}

/// Builds the `POST /library` body from the variant as the merchant last saw it.
pub fn resolve_save_request(
    shop_id: &str,
    review: &Review,
    variant_id: &str,
    selection: &Selection,
) -> Result<SaveAdRequest, AppError> {
    let variant = review.variant(variant_id)?;
    Ok(SaveAdRequest {
        shop_id: shop_id.to_string(),
        headline: variant.headline().to_string(),
        body: variant.primary_text().to_string(),
        description: variant.description().map(str::to_string),
        cta: variant.original.cta.clone(),
        platform: review.platform,
        goal: review.goal,
        image_urls: selection.image_urls(),
        product: product_snapshot(selection),
        status: AdStatus::Draft,
        variant_type: variant.original.variant_type.clone(),
        predicted_score: variant.original.predicted_score,
    })
}

fn finish_save(session: &mut Session) {
    session.pending.finish(PendingOp::Save);
    session.pending.finish(PendingOp::CrossPost);
}

fn close_after_save(session: &mut Session) {
    session.review = None;
    session.progress = Progress::default();
    if session.dialog == Dialog::Review {
        session.dialog = Dialog::None;
    }
}

/// Persists the chosen variant and, when asked, publishes it.
pub async fn select_variant(
    sessions: &SessionStore,
    backend: &dyn StudioBackend,
    session_id: Uuid,
    variant_id: &str,
    options: SaveOptions,
) -> Result<SaveOutcome, AppError> {
    let (request, target) = sessions
        .update(session_id, |session| {
            let request = resolve_save_request(
                &session.shop_id,
                session.review()?,
                variant_id,
                &session.selection,
            )?;
            let target = if options.cross_post {
                let (account, campaign) = session.cross_post.resolved().ok_or_else(|| {
                    AppError::Validation(
                        "Choose an ad account and a campaign to publish to".to_string(),
                    )
                })?;
                Some((account.to_string(), campaign.to_string()))
            } else {
                None
            };

            session.pending.begin(PendingOp::Save)?;
            if target.is_some() {
                if let Err(err) = session.pending.begin(PendingOp::CrossPost) {
                    session.pending.finish(PendingOp::Save);
                    return Err(err);
                }
            }
            session.banner = None;
            Ok((request, target))
        })
        .await?;

    let ad = match backend.save_ad(&request).await {
        Ok(ad) => ad,
        Err(err) => {
            error!(component = "library", "Saving ad failed: {err}");
            let message = err.message_or(SAVE_FALLBACK);
            return sessions
                .update(session_id, |session| {
                    finish_save(session);
                    session.banner = Some(Banner::error(message.clone()));
                    Err(AppError::Upstream(message))
                })
                .await;
        }
    };
    info!("Saved ad {} as draft for shop {}", ad.id, ad.shop_id);

    let outcome = match target {
        None => SaveOutcome::Saved {
            redirect: edit_path(&ad.id),
            ad,
        },
        Some((ad_account_id, campaign_id)) => {
            let cross_post = CrossPostRequest {
                ad_id: ad.id.clone(),
                ad_account_id,
                campaign_id,
            };
            match backend.create_external_ad(&cross_post).await {
                Ok(receipt) => {
                    info!("Published ad {} as {}", ad.id, receipt.external_ad_id);
                    SaveOutcome::Published {
                        redirect: detail_path(&ad.id),
                        external_ad_id: receipt.external_ad_id,
                        ad,
                    }
                }
                Err(err) => {
                    error!(
                        component = "cross_post",
                        "Cross-posting ad {} failed: {err}", ad.id
                    );
                    SaveOutcome::PartiallyFailed {
                        redirect: edit_path(&ad.id),
                        error: err.message_or(CROSS_POST_FALLBACK),
                        ad,
                    }
                }
            }
        }
    };

    sessions
        .update(session_id, |session| {
            finish_save(session);
            close_after_save(session);
            session.banner = match &outcome {
                SaveOutcome::Saved { .. } => None,
                SaveOutcome::Published { .. } => Some(Banner::success(PUBLISHED_MESSAGE)),
                SaveOutcome::PartiallyFailed { error, .. } => Some(Banner::error(error.clone())),
            };
            Ok(())
        })
        .await?;

    Ok(outcome)
}

/// Moves a saved ad along its lifecycle. Illegal moves never reach the network.
///
/// The library has no single-ad lookup, so the current status comes from a listing.
/// `known` is the status the caller last saw; it narrows that listing, and a miss
/// (the ad moved on elsewhere) falls back to the whole shop.
pub async fn change_status(
    backend: &dyn StudioBackend,
    shop_id: &str,
    ad_id: &str,
    known: Option<AdStatus>,
    next: AdStatus,
) -> Result<AdLibraryItem, AppError> {
    let mut current = current_status(backend, shop_id, ad_id, known).await?;
    if current.is_none() && known.is_some() {
        current = current_status(backend, shop_id, ad_id, None).await?;
    }
    let current = current.ok_or_else(|| AppError::NotFound(format!("Ad {ad_id} not found")))?;

    if current.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Ad {ad_id} is archived and can no longer change status"
        )));
    }
    if !current.can_transition_to(next) {
        warn!(
            "Rejected status change for ad {}: {} -> {}",
            ad_id,
            current.as_str(),
            next.as_str()
        );
        return Err(AppError::Conflict(format!(
            "Cannot change an ad from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }

    backend.update_ad_status(ad_id, next).await.map_err(|err| {
        error!(component = "library", "Updating ad {ad_id} failed: {err}");
        AppError::from(err)
    })
}

async fn current_status(
    backend: &dyn StudioBackend,
    shop_id: &str,
    ad_id: &str,
    filter: Option<AdStatus>,
) -> Result<Option<AdStatus>, AppError> {
    let ads = backend.list_ads(shop_id, filter).await.map_err(|err| {
        error!(component = "library", "Loading ads for shop {shop_id} failed: {err}");
        AppError::from(err)
    })?;
    Ok(ads.iter().find(|ad| ad.id == ad_id).map(|ad| ad.status))
}

/// A library item with its derived ratios.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub item: AdLibraryItem,
    pub ratios: MetricRatios,
}

pub async fn list(
    backend: &dyn StudioBackend,
    shop_id: &str,
    status: Option<AdStatus>,
) -> Result<Vec<LibraryEntry>, AppError> {
    let ads = backend.list_ads(shop_id, status).await.map_err(|err| {
        error!(component = "library", "Loading ads for shop {shop_id} failed: {err}");
        AppError::from(err)
    })?;
    Ok(ads
        .into_iter()
        .map(|item| LibraryEntry {
            ratios: MetricRatios::from(&item.metrics),
            item,
        })
        .collect())
}
