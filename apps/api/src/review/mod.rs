//! Variant review: per-field edits, grid and compare modes, quality labels.

pub mod compare;
pub mod handlers;
pub mod quality;
pub mod variants;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::generation::{Goal, Platform};
use crate::models::variant::{GenerationMetadata, GenerationResult};
use crate::review::compare::{differing_fields, CompareField, CompareSelection, COMPARE_DEPTH};
use crate::review::quality::{
    char_limits, clamp_score, counter, quality_label, score_percent, CharCounter, QualityLabel,
};
use crate::review::variants::{EditableVariant, VariantField};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    #[default]
    Grid,
    Compare,
}

/// The open review of one generation run.
#[derive(Debug, Clone)]
pub struct Review {
    pub platform: Platform,
    pub goal: Goal,
    pub variants: Vec<EditableVariant>,
    pub mode: ReviewMode,
    pub compare: CompareSelection,
    pub metadata: GenerationMetadata,
}

impl Review {
    pub fn new(platform: Platform, goal: Goal, result: GenerationResult) -> Self {
        Self {
            platform,
            goal,
            variants: result
                .variants
                .into_iter()
                .map(EditableVariant::new)
                .collect(),
            mode: ReviewMode::Grid,
            compare: CompareSelection::default(),
            metadata: result.metadata,
        }
    }

    pub fn variant(&self, id: &str) -> Result<&EditableVariant, AppError> {
        self.variants
            .iter()
            .find(|v| v.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("Variant {id} not found")))
    }

    pub fn edit(
        &mut self,
        id: &str,
        field: VariantField,
        value: String,
    ) -> Result<&EditableVariant, AppError> {
        let variant = self
            .variants
            .iter_mut()
            .find(|v| v.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("Variant {id} not found")))?;
        variant.set(field, value);
        Ok(variant)
    }

    /// Switches mode. Entering compare mode fills the selection from the first variants.
    pub fn set_mode(&mut self, mode: ReviewMode) -> Result<(), AppError> {
        if mode == ReviewMode::Compare {
            if self.variants.len() < COMPARE_DEPTH {
                return Err(AppError::Validation(
                    "At least two variants are needed to compare".to_string(),
                ));
            }
            if self.compare.len() < COMPARE_DEPTH {
                self.compare
                    .fill_from(self.variants.iter().map(EditableVariant::id));
            }
        }
        self.mode = mode;
        Ok(())
    }

    pub fn select_for_compare(&mut self, id: &str) -> Result<(), AppError> {
        self.variant(id)?;
        self.compare.select(id);
        Ok(())
    }

    /// Fields that differ between the compared pair. Empty outside compare mode.
    pub fn differences(&self) -> Vec<CompareField> {
        if self.mode != ReviewMode::Compare {
            return Vec::new();
        }
        let Some((a, b)) = self.compare.pair() else {
            return Vec::new();
        };
        match (self.variant(a), self.variant(b)) {
            (Ok(a), Ok(b)) => differing_fields(a, b),
            _ => Vec::new(),
        }
    }

    pub fn view(&self) -> ReviewView {
        let compare = (self.mode == ReviewMode::Compare).then(|| CompareView {
            selected: self.compare.ids(),
            differing_fields: self.differences(),
        });
        ReviewView {
            mode: self.mode,
            platform: self.platform,
            goal: self.goal,
            variants: self
                .variants
                .iter()
                .map(|v| VariantView::build(v, self.platform, self.compare.contains(v.id())))
                .collect(),
            compare,
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldCounters {
    pub headline: CharCounter,
    pub primary_text: CharCounter,
    pub description: CharCounter,
}

/// A variant as rendered on a review card.
#[derive(Debug, Clone, Serialize)]
pub struct VariantView {
    pub id: String,
    pub variant_number: u32,
    pub variant_type: String,
    pub headline: String,
    pub alternative_headlines: Vec<String>,
    pub primary_text: String,
    pub description: Option<String>,
    pub cta: String,
    pub cta_rationale: String,
    pub hook_technique: String,
    pub tone: String,
    pub score: f64,
    pub score_percent: u8,
    pub quality: QualityLabel,
    pub score_breakdown: BTreeMap<String, f64>,
    pub counters: FieldCounters,
    pub edited: bool,
    pub selected_for_compare: bool,
}

impl VariantView {
    fn build(variant: &EditableVariant, platform: Platform, selected: bool) -> Self {
        let limits = char_limits(platform);
        let original = &variant.original;
        Self {
            id: original.id.clone(),
            variant_number: original.variant_number,
            variant_type: original.variant_type.clone(),
            headline: variant.headline().to_string(),
            alternative_headlines: original.alternative_headlines.clone(),
            primary_text: variant.primary_text().to_string(),
            description: variant.description().map(str::to_string),
            cta: original.cta.clone(),
            cta_rationale: original.cta_rationale.clone(),
            hook_technique: original.hook_technique.clone(),
            tone: original.tone.clone(),
            score: clamp_score(original.predicted_score),
            score_percent: score_percent(original.predicted_score),
            quality: quality_label(original.predicted_score),
            score_breakdown: original
                .score_breakdown
                .iter()
                .map(|(k, v)| (k.clone(), v.clamp(0.0, 1.0)))
                .collect(),
            counters: FieldCounters {
                headline: counter(variant.headline(), limits.headline),
                primary_text: counter(variant.primary_text(), limits.primary_text),
                description: counter(variant.description().unwrap_or(""), limits.description),
            },
            edited: variant.is_edited(),
            selected_for_compare: selected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareView {
    pub selected: Vec<String>,
    pub differing_fields: Vec<CompareField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub mode: ReviewMode,
    pub platform: Platform,
    pub goal: Goal,
    pub variants: Vec<VariantView>,
    pub compare: Option<CompareView>,
    pub metadata: GenerationMetadata,
}
