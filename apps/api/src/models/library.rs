use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::generation::{Goal, Platform};

/// Lifecycle status of a saved ad.
///
/// draft → active → paused → {active | archived}; archived is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdStatus {
    Draft,
    Active,
    Paused,
    Archived,
}

impl AdStatus {
    pub fn can_transition_to(self, next: AdStatus) -> bool {
        matches!(
            (self, next),
            (AdStatus::Draft, AdStatus::Active)
                | (AdStatus::Active, AdStatus::Paused)
                | (AdStatus::Paused, AdStatus::Active)
                | (AdStatus::Paused, AdStatus::Archived)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == AdStatus::Archived
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdStatus::Draft => "draft",
            AdStatus::Active => "active",
            AdStatus::Paused => "paused",
            AdStatus::Archived => "archived",
        }
    }
}

/// Snapshot of the product an ad was generated for, frozen at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdMetrics {
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub revenue: f64,
}

impl AdMetrics {
    pub fn ctr(&self) -> f64 {
        ratio(self.clicks as f64, self.impressions as f64)
    }

    pub fn conversion_rate(&self) -> f64 {
        ratio(self.conversions as f64, self.clicks as f64)
    }

    pub fn cost_per_click(&self) -> f64 {
        ratio(self.spend, self.clicks as f64)
    }

    pub fn roas(&self) -> f64 {
        ratio(self.revenue, self.spend)
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// A persisted ad in the merchant's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdLibraryItem {
    pub id: String,
    #[serde(default)]
    pub shop_id: String,
    pub status: AdStatus,
    pub headline: String,
    pub body: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cta: String,
    pub platform: Platform,
    pub goal: Goal,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub product: Option<ProductSnapshot>,
    #[serde(default)]
    pub metrics: AdMetrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived ratios returned next to each library item.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRatios {
    pub ctr: f64,
    pub conversion_rate: f64,
    pub cost_per_click: f64,
    pub roas: f64,
}

impl From<&AdMetrics> for MetricRatios {
    fn from(m: &AdMetrics) -> Self {
        Self {
            ctr: m.ctr(),
            conversion_rate: m.conversion_rate(),
            cost_per_click: m.cost_per_click(),
            roas: m.roas(),
        }
    }
}

/// Body of `POST /library`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAdRequest {
    pub shop_id: String,
    pub headline: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cta: String,
    pub platform: Platform,
    pub goal: Goal,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSnapshot>,
    pub status: AdStatus,
    pub variant_type: String,
    pub predicted_score: f64,
}

/// Body of `POST /facebook/create-ad`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossPostRequest {
    pub ad_id: String,
    pub ad_account_id: String,
    pub campaign_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossPostReceipt {
    pub external_ad_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_allows_documented_transitions() {
        assert!(AdStatus::Draft.can_transition_to(AdStatus::Active));
        assert!(AdStatus::Active.can_transition_to(AdStatus::Paused));
        assert!(AdStatus::Paused.can_transition_to(AdStatus::Active));
        assert!(AdStatus::Paused.can_transition_to(AdStatus::Archived));
    }

    #[test]
    fn test_archived_is_terminal() {
        assert!(AdStatus::Archived.is_terminal());
        for next in [AdStatus::Draft, AdStatus::Active, AdStatus::Paused, AdStatus::Archived] {
            assert!(!AdStatus::Archived.can_transition_to(next));
        }
    }

    #[test]
    fn test_lifecycle_rejects_skips_and_self_transitions() {
        assert!(!AdStatus::Draft.can_transition_to(AdStatus::Paused));
        assert!(!AdStatus::Draft.can_transition_to(AdStatus::Archived));
        assert!(!AdStatus::Active.can_transition_to(AdStatus::Draft));
        assert!(!AdStatus::Active.can_transition_to(AdStatus::Active));
    }

    #[test]
    fn test_ratios_are_zero_with_empty_denominators() {
        let metrics = AdMetrics::default();
        assert_eq!(metrics.ctr(), 0.0);
        assert_eq!(metrics.conversion_rate(), 0.0);
        assert_eq!(metrics.cost_per_click(), 0.0);
        assert_eq!(metrics.roas(), 0.0);
    }

    #[test]
    fn test_ratios_compute_from_counts() {
        let metrics = AdMetrics {
            impressions: 1000,
            clicks: 50,
            conversions: 5,
            spend: 25.0,
            revenue: 100.0,
        };
        assert!((metrics.ctr() - 0.05).abs() < f64::EPSILON);
        assert!((metrics.conversion_rate() - 0.1).abs() < f64::EPSILON);
        assert!((metrics.cost_per_click() - 0.5).abs() < f64::EPSILON);
        assert!((metrics.roas() - 4.0).abs() < f64::EPSILON);
    }
}
