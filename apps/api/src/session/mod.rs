//! Per-merchant workflow session.
//!
//! Everything the ad-creation screen needs to remember between calls lives on one
//! `Session`: the form, the product/image selection, which dialog is open, generation
//! progress, the variant review, pending operations, and the banner.

pub mod handlers;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brand_voice::{BrandVoice, BrandVoiceView};
use crate::catalog::debounce::SearchDebouncer;
use crate::errors::AppError;
use crate::generation::builder::GenerationForm;
use crate::generation::progress::Progress;
use crate::generation::selection::{SelectedImage, Selection};
use crate::models::catalog::Product;
use crate::review::{Review, ReviewView};

pub use store::SessionStore;

/// Which modal is on screen. Exactly one at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dialog {
    #[default]
    None,
    ProductSelect,
    ImageSelect {
        product: Product,
    },
    Generating,
    Review,
}

/// Operations that must not overlap within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOp {
    Generation,
    Save,
    CrossPost,
    BrandVoice,
}

impl PendingOp {
    fn describe(self) -> &'static str {
        match self {
            PendingOp::Generation => "Ad generation",
            PendingOp::Save => "Saving the ad",
            PendingOp::CrossPost => "Publishing the ad",
            PendingOp::BrandVoice => "Brand voice generation",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PendingOps(Vec<PendingOp>);

impl PendingOps {
    /// Marks `op` in flight. Fails if it already is.
    pub fn begin(&mut self, op: PendingOp) -> Result<(), AppError> {
        if self.0.contains(&op) {
            return Err(AppError::Conflict(format!(
                "{} is already in progress",
                op.describe()
            )));
        }
        self.0.push(op);
        Ok(())
    }

    pub fn finish(&mut self, op: PendingOp) {
        self.0.retain(|p| *p != op);
    }

    pub fn contains(&self, op: PendingOp) -> bool {
        self.0.contains(&op)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn list(&self) -> Vec<PendingOp> {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Error,
    Success,
}

/// Dismissable message shown above the workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }
}

/// Ad account and campaign chosen for cross-posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossPostTarget {
    pub ad_account_id: Option<String>,
    pub campaign_id: Option<String>,
}

impl CrossPostTarget {
    /// Both ids, when both are chosen.
    pub fn resolved(&self) -> Option<(&str, &str)> {
        match (&self.ad_account_id, &self.campaign_id) {
            (Some(account), Some(campaign)) => Some((account.as_str(), campaign.as_str())),
            _ => None,
        }
    }
}

pub struct Session {
    pub id: Uuid,
    pub shop_id: String,
    pub form: GenerationForm,
    pub selection: Selection,
    pub dialog: Dialog,
    pub progress: Progress,
    pub review: Option<Review>,
    pub pending: PendingOps,
    pub banner: Option<Banner>,
    pub cross_post: CrossPostTarget,
    pub brand_voice: BrandVoice,
    pub search: Arc<SearchDebouncer>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(shop_id: impl Into<String>, search_debounce: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            shop_id: shop_id.into(),
            form: GenerationForm::default(),
            selection: Selection::default(),
            dialog: Dialog::None,
            progress: Progress::default(),
            review: None,
            pending: PendingOps::default(),
            banner: None,
            cross_post: CrossPostTarget::default(),
            brand_voice: BrandVoice::default(),
            search: Arc::new(SearchDebouncer::new(search_debounce)),
            created_at: Utc::now(),
        }
    }

    pub fn review(&self) -> Result<&Review, AppError> {
        self.review
            .as_ref()
            .ok_or_else(|| AppError::Conflict("No variant review is open".to_string()))
    }

    /// The open review, for editing. Locked while the chosen variant is being saved.
    pub fn review_mut(&mut self) -> Result<&mut Review, AppError> {
        if self.pending.contains(PendingOp::Save) {
            return Err(AppError::Conflict(
                "Cannot edit variants while the ad is being saved".to_string(),
            ));
        }
        self.review
            .as_mut()
            .ok_or_else(|| AppError::Conflict("No variant review is open".to_string()))
    }

    pub fn open_product_picker(&mut self) -> Result<(), AppError> {
        match self.dialog {
            Dialog::None | Dialog::ProductSelect => {
                self.dialog = Dialog::ProductSelect;
                Ok(())
            }
            _ => Err(AppError::Conflict(
                "Another step is already open".to_string(),
            )),
        }
    }

    /// Dismisses the picker dialogs. Generation and review have their own exits.
    pub fn close_dialog(&mut self) -> Result<(), AppError> {
        match self.dialog {
            Dialog::Generating => Err(AppError::Conflict(
                "Ad generation is in progress".to_string(),
            )),
            Dialog::Review => Err(AppError::Conflict(
                "Close the review to discard the variants".to_string(),
            )),
            _ => {
                self.dialog = Dialog::None;
                Ok(())
            }
        }
    }

    /// Picking a product moves on to choosing which of its images to use.
    pub fn pick_product(&mut self, product: Product) -> Result<(), AppError> {
        match self.dialog {
            Dialog::None | Dialog::ProductSelect | Dialog::ImageSelect { .. } => {
                self.dialog = Dialog::ImageSelect { product };
                Ok(())
            }
            _ => Err(AppError::Conflict(
                "Products cannot be changed right now".to_string(),
            )),
        }
    }

    /// Finishes the image step. The first product selected pre-fills an empty description.
    pub fn complete_image_selection(&mut self, urls: &[String]) -> Result<(), AppError> {
        let Dialog::ImageSelect { product } = &self.dialog else {
            return Err(AppError::Conflict(
                "No product is waiting for image selection".to_string(),
            ));
        };
        let product = product.clone();
        let first = self.selection.add_product_images(&product, urls)?;
        if first {
            self.form.autofill_from(&product);
        }
        self.dialog = Dialog::None;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.form.reset_description();
    }

    /// Discards the review without persisting anything.
    pub fn close_review(&mut self) -> Result<(), AppError> {
        if self.pending.contains(PendingOp::Save) {
            return Err(AppError::Conflict(
                "Cannot close the review while the ad is being saved".to_string(),
            ));
        }
        self.review = None;
        if self.dialog == Dialog::Review {
            self.dialog = Dialog::None;
        }
        Ok(())
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            shop_id: self.shop_id.clone(),
            dialog: self.dialog.clone(),
            form: self.form.clone(),
            selected_products: self.selection.products.clone(),
            selected_images: self.selection.images.clone(),
            progress: self.progress.clone(),
            review: self.review.as_ref().map(Review::view),
            pending: self.pending.list(),
            banner: self.banner.clone(),
            cross_post: self.cross_post.clone(),
            brand_voice: self.brand_voice.view(),
            created_at: self.created_at,
        }
    }
}

/// Snapshot of a session as the front-end renders it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub shop_id: String,
    pub dialog: Dialog,
    pub form: GenerationForm,
    pub selected_products: Vec<Product>,
    pub selected_images: Vec<SelectedImage>,
    pub progress: Progress,
    pub review: Option<ReviewView>,
    pub pending: Vec<PendingOp>,
    pub banner: Option<Banner>,
    pub cross_post: CrossPostTarget,
    pub brand_voice: BrandVoiceView,
    pub created_at: DateTime<Utc>,
}
