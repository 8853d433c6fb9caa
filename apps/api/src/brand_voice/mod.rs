//! Brand voice: writing samples, the generated voice profile, and fine-tuning.
//!
//! Flow: merchant adds samples → once the threshold is reached and no profile exists,
//!       `POST /brand-voice/generate` builds one → the merchant may edit the summary
//!       and tune it → the result rides along on every generation request.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::brand_voice::{BrandVoiceRequest, GeneratedVoice};
use crate::session::{Banner, PendingOp, SessionStore, SessionView};
use crate::upstream::StudioBackend;

pub const MAX_SAMPLES: usize = 20;
pub const MAX_SAMPLE_CHARS: usize = 5000;
pub const MAX_TUNING_LEVEL: u8 = 100;

const VOICE_FALLBACK: &str = "Failed to generate brand voice";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WritingSample {
    pub id: Uuid,
    pub text: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceProfile {
    pub summary: String,
    /// Merchant rewrite of `summary`. Wins wherever the summary is used.
    pub edited_summary: Option<String>,
    pub tone_attributes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl VoiceProfile {
    pub fn display_summary(&self) -> &str {
        self.edited_summary.as_deref().unwrap_or(&self.summary)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmojiUsage {
    #[default]
    None,
    Light,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceTuning {
    pub formality: u8,
    pub enthusiasm: u8,
    #[serde(default)]
    pub emoji_usage: EmojiUsage,
    #[serde(default)]
    pub avoid_phrases: Vec<String>,
}

impl Default for VoiceTuning {
    fn default() -> Self {
        Self {
            formality: 50,
            enthusiasm: 50,
            emoji_usage: EmojiUsage::None,
            avoid_phrases: Vec::new(),
        }
    }
}

impl VoiceTuning {
    fn validate(&self) -> Result<(), String> {
        if self.formality > MAX_TUNING_LEVEL {
            return Err(format!("formality must be between 0 and {MAX_TUNING_LEVEL}"));
        }
        if self.enthusiasm > MAX_TUNING_LEVEL {
            return Err(format!("enthusiasm must be between 0 and {MAX_TUNING_LEVEL}"));
        }
        if self.avoid_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err("Phrases to avoid cannot be blank".to_string());
        }
        Ok(())
    }
}

/// Per-session brand voice state.
#[derive(Debug, Clone, Default)]
pub struct BrandVoice {
    pub samples: Vec<WritingSample>,
    pub profile: Option<VoiceProfile>,
    pub tuning: VoiceTuning,
}

impl BrandVoice {
    pub fn add_sample(&mut self, text: &str) -> Result<&WritingSample, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation(
                "Writing sample cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_SAMPLE_CHARS {
            return Err(AppError::Validation(format!(
                "Writing samples are limited to {MAX_SAMPLE_CHARS} characters"
            )));
        }
        if self.samples.len() >= MAX_SAMPLES {
            return Err(AppError::Validation(format!(
                "At most {MAX_SAMPLES} writing samples can be added"
            )));
        }
        self.samples.push(WritingSample {
            id: Uuid::new_v4(),
            text: text.to_string(),
            added_at: Utc::now(),
        });
        Ok(&self.samples[self.samples.len() - 1])
    }

    pub fn remove_sample(&mut self, id: Uuid) -> Result<(), AppError> {
        let before = self.samples.len();
        self.samples.retain(|s| s.id != id);
        if self.samples.len() == before {
            return Err(AppError::NotFound(format!("Writing sample {id} not found")));
        }
        Ok(())
    }

    /// Enough samples collected and nothing generated yet.
    pub fn should_generate(&self, threshold: usize) -> bool {
        self.profile.is_none() && self.samples.len() >= threshold.max(1)
    }

    pub fn request(&self, shop_id: &str) -> BrandVoiceRequest {
        BrandVoiceRequest {
            shop_id: shop_id.to_string(),
            samples: self.samples.iter().map(|s| s.text.clone()).collect(),
        }
    }

    /// Replaces the profile. A previous summary edit does not survive regeneration.
    pub fn apply_generated(&mut self, voice: GeneratedVoice) {
        self.profile = Some(VoiceProfile {
            summary: voice.summary,
            edited_summary: None,
            tone_attributes: voice.tone_attributes,
            generated_at: Utc::now(),
        });
    }

    pub fn edit_summary(&mut self, summary: &str) -> Result<(), AppError> {
        let profile = self
            .profile
            .as_mut()
            .ok_or_else(|| AppError::Conflict("No brand voice has been generated yet".to_string()))?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(AppError::Validation(
                "Brand voice summary cannot be empty".to_string(),
            ));
        }
        profile.edited_summary = Some(summary.to_string());
        Ok(())
    }

    pub fn set_tuning(&mut self, tuning: VoiceTuning) -> Result<(), AppError> {
        tuning.validate().map_err(AppError::Validation)?;
        self.tuning = VoiceTuning {
            avoid_phrases: tuning
                .avoid_phrases
                .iter()
                .map(|p| p.trim().to_string())
                .collect(),
            ..tuning
        };
        Ok(())
    }

    /// Voice guidance attached to generation requests, if a profile exists.
    pub fn voice_for_generation(&self) -> Option<String> {
        let profile = self.profile.as_ref()?;
        let mut parts = vec![profile.display_summary().to_string()];
        if !profile.tone_attributes.is_empty() {
            parts.push(format!("Tone: {}.", profile.tone_attributes.join(", ")));
        }
        parts.push(format!(
            "Formality {}/100, enthusiasm {}/100.",
            self.tuning.formality, self.tuning.enthusiasm
        ));
        parts.push(
            match self.tuning.emoji_usage {
                EmojiUsage::None => "Do not use emoji.",
                EmojiUsage::Light => "Use emoji sparingly.",
                EmojiUsage::Heavy => "Use emoji freely.",
            }
            .to_string(),
        );
        if !self.tuning.avoid_phrases.is_empty() {
            parts.push(format!("Avoid: {}.", self.tuning.avoid_phrases.join(", ")));
        }
        Some(parts.join(" "))
    }

    pub fn view(&self) -> BrandVoiceView {
        BrandVoiceView {
            samples: self.samples.clone(),
            profile: self.profile.as_ref().map(|p| ProfileView {
                summary: p.display_summary().to_string(),
                generated_summary: p.summary.clone(),
                edited: p.edited_summary.is_some(),
                tone_attributes: p.tone_attributes.clone(),
                generated_at: p.generated_at,
            }),
            tuning: self.tuning.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub summary: String,
    pub generated_summary: String,
    pub edited: bool,
    pub tone_attributes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandVoiceView {
    pub samples: Vec<WritingSample>,
    pub profile: Option<ProfileView>,
    pub tuning: VoiceTuning,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Adds a writing sample and, once enough are collected, builds the profile.
pub async fn add_sample(
    sessions: &SessionStore,
    backend: &dyn StudioBackend,
    session_id: Uuid,
    text: &str,
    threshold: usize,
) -> Result<SessionView, AppError> {
    let request = sessions
        .update(session_id, |session| {
            session.brand_voice.add_sample(text)?;
            if !session.brand_voice.should_generate(threshold)
                || session.pending.contains(PendingOp::BrandVoice)
            {
                return Ok(None);
            }
            session.pending.begin(PendingOp::BrandVoice)?;
            Ok(Some(session.brand_voice.request(&session.shop_id)))
        })
        .await?;

    match request {
        Some(request) => generate(sessions, backend, session_id, request).await,
        None => sessions.view(session_id).await,
    }
}

/// Re-runs profile generation regardless of an existing profile.
pub async fn regenerate(
    sessions: &SessionStore,
    backend: &dyn StudioBackend,
    session_id: Uuid,
    threshold: usize,
) -> Result<SessionView, AppError> {
    let request = sessions
        .update(session_id, |session| {
            let count = session.brand_voice.samples.len();
            if count < threshold.max(1) {
                return Err(AppError::Validation(format!(
                    "Add at least {threshold} writing samples first ({count} so far)"
                )));
            }
            session.pending.begin(PendingOp::BrandVoice)?;
            Ok(session.brand_voice.request(&session.shop_id))
        })
        .await?;

    generate(sessions, backend, session_id, request).await
}

async fn generate(
    sessions: &SessionStore,
    backend: &dyn StudioBackend,
    session_id: Uuid,
    request: BrandVoiceRequest,
) -> Result<SessionView, AppError> {
    info!(
        "Generating brand voice for shop {} from {} samples",
        request.shop_id,
        request.samples.len()
    );
    let outcome = backend.generate_brand_voice(&request).await;

    sessions
        .update(session_id, move |session| {
            session.pending.finish(PendingOp::BrandVoice);
            match outcome {
                Ok(voice) => {
                    session.brand_voice.apply_generated(voice);
                    Ok(session.view())
                }
                Err(err) => {
                    error!(component = "brand_voice", "Brand voice generation failed: {err}");
                    let message = err.message_or(VOICE_FALLBACK);
                    session.banner = Some(Banner::error(message.clone()));
                    Err(AppError::Upstream(message))
                }
            }
        })
        .await
}
