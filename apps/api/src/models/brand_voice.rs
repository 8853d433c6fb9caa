use serde::{Deserialize, Serialize};

/// Body of `POST /brand-voice/generate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandVoiceRequest {
    pub shop_id: String,
    pub samples: Vec<String>,
}

/// `data` payload of a successful `POST /brand-voice/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVoice {
    pub summary: String,
    #[serde(default)]
    pub tone_attributes: Vec<String>,
}
