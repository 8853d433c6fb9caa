use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One candidate ad produced by `POST /generate`. Never mutated after receipt;
/// merchant edits live on `review::EditableVariant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVariant {
    pub id: String,
    pub variant_number: u32,
    pub variant_type: String,
    pub headline: String,
    #[serde(default)]
    pub alternative_headlines: Vec<String>,
    pub primary_text: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cta: String,
    #[serde(default)]
    pub cta_rationale: String,
    #[serde(default)]
    pub hook_technique: String,
    #[serde(default)]
    pub tone: String,
    /// 0–10
    pub predicted_score: f64,
    /// Named sub-scores, each 0–1.
    #[serde(default)]
    pub score_breakdown: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    #[serde(default)]
    pub generation_time_ms: u64,
    #[serde(default)]
    pub ai_cost: f64,
}

/// `data` payload of a successful `POST /generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub variants: Vec<GeneratedVariant>,
    #[serde(default)]
    pub metadata: GenerationMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_deserializes_with_optional_fields_missing() {
        let json = serde_json::json!({
            "id": "v-1",
            "variantNumber": 1,
            "variantType": "benefit",
            "headline": "Boots that last",
            "primaryText": "Stitched by hand in Leon.",
            "cta": "Shop Now",
            "predictedScore": 7.4
        });
        let variant: GeneratedVariant = serde_json::from_value(json).unwrap();
        assert!(variant.alternative_headlines.is_empty());
        assert!(variant.description.is_none());
        assert!(variant.score_breakdown.is_empty());
        assert_eq!(variant.predicted_score, 7.4);
    }

    #[test]
    fn test_variant_requires_headline() {
        let json = serde_json::json!({
            "id": "v-1",
            "variantNumber": 1,
            "variantType": "benefit",
            "primaryText": "x",
            "cta": "Shop Now",
            "predictedScore": 5.0
        });
        assert!(serde_json::from_value::<GeneratedVariant>(json).is_err());
    }
}
