//! Quality labels and character counters for generated variants.
//!
//! Scores are on a 0–10 scale everywhere. The displayed percentage is
//! `round(score × 10)`.

use serde::Serialize;

use crate::models::generation::Platform;

pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QualityLabel {
    Excellent,
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

/// Clamps to 0–10; NaN counts as 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, MAX_SCORE)
    }
}

pub fn quality_label(score: f64) -> QualityLabel {
    let score = clamp_score(score);
    if score >= 8.0 {
        QualityLabel::Excellent
    } else if score >= 6.0 {
        QualityLabel::Good
    } else {
        QualityLabel::NeedsImprovement
    }
}

pub fn score_percent(score: f64) -> u8 {
    (clamp_score(score) * 10.0).round() as u8
}

/// Per-platform character limits for the editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharLimits {
    pub headline: usize,
    pub primary_text: usize,
    pub description: usize,
}

pub fn char_limits(platform: Platform) -> CharLimits {
    match platform {
        Platform::Meta | Platform::Instagram => CharLimits {
            headline: 40,
            primary_text: 125,
            description: 30,
        },
        Platform::Google => CharLimits {
            headline: 30,
            primary_text: 90,
            description: 90,
        },
        Platform::Tiktok => CharLimits {
            headline: 40,
            primary_text: 100,
            description: 100,
        },
        Platform::Pinterest => CharLimits {
            headline: 100,
            primary_text: 500,
            description: 500,
        },
    }
}

/// Counter shown under an editable field. Going over the limit only changes how
/// the counter is styled; the edit itself is always accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharCounter {
    pub count: usize,
    pub limit: usize,
    pub over_limit: bool,
}

pub fn counter(text: &str, limit: usize) -> CharCounter {
    let count = text.chars().count();
    CharCounter {
        count,
        limit,
        over_limit: count > limit,
    }
}
