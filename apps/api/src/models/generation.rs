use serde::{Deserialize, Serialize};

/// Maximum length of the free-text product description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Meta,
    Instagram,
    Google,
    Tiktok,
    Pinterest,
}

impl Platform {
    /// Only Meta and Instagram can be generated for today; the rest are listed as "coming soon".
    pub fn is_enabled(self) -> bool {
        matches!(self, Platform::Meta | Platform::Instagram)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Meta => "meta",
            Platform::Instagram => "instagram",
            Platform::Google => "google",
            Platform::Tiktok => "tiktok",
            Platform::Pinterest => "pinterest",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Conversion,
    Awareness,
    Engagement,
    Traffic,
    AppInstalls,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LengthMode {
    #[default]
    Auto,
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudienceTemperature {
    #[default]
    Cold,
    Warm,
    Hot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductComplexity {
    #[default]
    Low,
    Medium,
    High,
}

/// Advanced tuning knobs sent alongside a generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedTuning {
    #[serde(default)]
    pub length_mode: LengthMode,
    #[serde(default)]
    pub audience_temperature: AudienceTemperature,
    #[serde(default)]
    pub product_complexity: ProductComplexity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub include_story: bool,
    #[serde(default)]
    pub premium_positioning: bool,
}

/// A product attached to a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Wire payload for `POST /generate`.
///
/// The description travels as `productInfo`. Built only through
/// `generation::builder::build_request`, which enforces the non-blank description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub platform: Platform,
    pub goal: Goal,
    #[serde(rename = "productInfo")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    pub products: Vec<ProductRef>,
    pub image_urls: Vec<String>,
    #[serde(rename = "advancedOptions", skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedTuning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_voice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_meta_and_instagram_enabled() {
        assert!(Platform::Meta.is_enabled());
        assert!(Platform::Instagram.is_enabled());
        assert!(!Platform::Google.is_enabled());
        assert!(!Platform::Tiktok.is_enabled());
        assert!(!Platform::Pinterest.is_enabled());
    }

    #[test]
    fn test_description_serializes_as_product_info() {
        let request = GenerationRequest {
            platform: Platform::Instagram,
            goal: Goal::AppInstalls,
            description: "Handmade leather boots".to_string(),
            target_audience: None,
            products: vec![],
            image_urls: vec![],
            advanced: Some(AdvancedTuning {
                length_mode: LengthMode::Short,
                audience_temperature: AudienceTemperature::Warm,
                ..Default::default()
            }),
            brand_voice: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["productInfo"], "Handmade leather boots");
        assert!(json.get("description").is_none());
        assert!(json.get("targetAudience").is_none());
        assert_eq!(json["platform"], "instagram");
        assert_eq!(json["goal"], "app_installs");
        assert_eq!(json["advancedOptions"]["lengthMode"], "SHORT");
        assert_eq!(json["advancedOptions"]["audienceTemperature"], "WARM");
        assert_eq!(json["advancedOptions"]["productComplexity"], "LOW");
    }
}
