//! Generation request builder: the ad form, its auto-fill behaviour, and validation.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::selection::Selection;
use crate::models::catalog::Product;
use crate::models::generation::{
    AdvancedTuning, GenerationRequest, Goal, Platform, MAX_DESCRIPTION_CHARS,
};

pub const EMPTY_DESCRIPTION_ERROR: &str = "Please enter a product description";

/// Form state as the merchant fills it in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationForm {
    pub platform: Platform,
    pub goal: Goal,
    pub description: String,
    pub target_audience: String,
    pub advanced: Option<AdvancedTuning>,
    /// Inline validation message shown under the form.
    pub inline_error: Option<String>,
}

/// Partial update from the front-end. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormUpdate {
    pub platform: Option<Platform>,
    pub goal: Option<Goal>,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub advanced: Option<AdvancedTuning>,
    #[serde(default)]
    pub clear_advanced: bool,
}

impl GenerationForm {
    pub fn apply(&mut self, update: FormUpdate) {
        if let Some(platform) = update.platform {
            self.platform = platform;
        }
        if let Some(goal) = update.goal {
            self.goal = goal;
        }
        if let Some(description) = update.description {
            self.description = description;
            self.inline_error = None;
        }
        if let Some(audience) = update.target_audience {
            self.target_audience = audience;
        }
        if update.clear_advanced {
            self.advanced = None;
        } else if let Some(advanced) = update.advanced {
            self.advanced = Some(advanced);
        }
    }

    /// Pre-fills the description from the first selected product when the merchant
    /// has not typed one yet.
    pub fn autofill_from(&mut self, product: &Product) {
        if !self.description.trim().is_empty() {
            return;
        }
        if let Some(text) = product.description.as_deref().map(str::trim) {
            if !text.is_empty() {
                self.description = truncate_chars(text, MAX_DESCRIPTION_CHARS);
                self.inline_error = None;
            }
        }
    }

    pub fn reset_description(&mut self) {
        self.description.clear();
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Checks the form without touching the network.
pub fn validate(form: &GenerationForm) -> Result<(), String> {
    let description = form.description.trim();
    if description.is_empty() {
        return Err(EMPTY_DESCRIPTION_ERROR.to_string());
    }
    let length = description.chars().count();
    if length > MAX_DESCRIPTION_CHARS {
        return Err(format!(
            "Description is {length} characters; the limit is {MAX_DESCRIPTION_CHARS}"
        ));
    }
    if !form.platform.is_enabled() {
        return Err(format!(
            "{} ads are not available yet",
            form.platform.as_str()
        ));
    }
    if let Some(price) = form.advanced.as_ref().and_then(|a| a.price) {
        if !price.is_finite() || price < 0.0 {
            return Err("Price cannot be negative".to_string());
        }
    }
    Ok(())
}

/// Validates the form and assembles the `POST /generate` payload.
pub fn build_request(
    form: &GenerationForm,
    selection: &Selection,
    brand_voice: Option<String>,
) -> Result<GenerationRequest, AppError> {
    validate(form).map_err(AppError::Validation)?;

    let audience = form.target_audience.trim();
    Ok(GenerationRequest {
        platform: form.platform,
        goal: form.goal,
        description: form.description.trim().to_string(),
        target_audience: (!audience.is_empty()).then(|| audience.to_string()),
        products: selection.products.iter().map(Product::to_ref).collect(),
        image_urls: selection.image_urls(),
        advanced: form.advanced.clone(),
        brand_voice,
    })
}
