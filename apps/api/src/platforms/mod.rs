//! Ad-platform reference data (ad accounts, campaigns) and the cross-post target.

pub mod handlers;

use serde::Deserialize;
use tracing::error;

use crate::errors::AppError;
use crate::models::platform::{AdAccount, Campaign};
use crate::session::CrossPostTarget;
use crate::upstream::StudioBackend;

pub async fn ad_accounts(backend: &dyn StudioBackend) -> Result<Vec<AdAccount>, AppError> {
    backend.ad_accounts().await.map_err(|err| {
        error!(component = "platforms", "Failed to load ad accounts: {err}");
        AppError::from(err)
    })
}

pub async fn campaigns(
    backend: &dyn StudioBackend,
    ad_account_id: &str,
) -> Result<Vec<Campaign>, AppError> {
    let ad_account_id = ad_account_id.trim();
    if ad_account_id.is_empty() {
        return Err(AppError::Validation(
            "ad_account_id is required".to_string(),
        ));
    }
    backend.campaigns(ad_account_id).await.map_err(|err| {
        error!(
            component = "platforms",
            "Failed to load campaigns for {ad_account_id}: {err}"
        );
        AppError::from(err)
    })
}

/// Partial update of the cross-post target. `Some("")` clears a field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetUpdate {
    pub ad_account_id: Option<String>,
    pub campaign_id: Option<String>,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CrossPostTarget {
    /// Changing the account drops the campaign, which belonged to the old account.
    pub fn apply(&mut self, update: TargetUpdate) -> Result<(), AppError> {
        if let Some(account) = update.ad_account_id {
            let account = non_blank(account);
            if account != self.ad_account_id {
                self.campaign_id = None;
            }
            self.ad_account_id = account;
        }
        if let Some(campaign) = update.campaign_id {
            let campaign = non_blank(campaign);
            if campaign.is_some() && self.ad_account_id.is_none() {
                return Err(AppError::Validation(
                    "Choose an ad account before choosing a campaign".to_string(),
                ));
            }
            self.campaign_id = campaign;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::fake::FakeBackend;

    fn update(account: Option<&str>, campaign: Option<&str>) -> TargetUpdate {
        TargetUpdate {
            ad_account_id: account.map(str::to_string),
            campaign_id: campaign.map(str::to_string),
        }
    }

    #[test]
    fn test_campaign_requires_account() {
        let mut target = CrossPostTarget::default();
        let result = target.apply(update(None, Some("cmp_1")));
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(target.campaign_id.is_none());

        target.apply(update(Some("act_1"), Some("cmp_1"))).unwrap();
        assert_eq!(target.resolved(), Some(("act_1", "cmp_1")));
    }

    #[test]
    fn test_changing_account_clears_campaign() {
        let mut target = CrossPostTarget::default();
        target.apply(update(Some("act_1"), Some("cmp_1"))).unwrap();
        target.apply(update(Some("act_2"), None)).unwrap();
        assert_eq!(target.ad_account_id.as_deref(), Some("act_2"));
        assert!(target.campaign_id.is_none());

        target.apply(update(Some("act_2"), Some("cmp_9"))).unwrap();
        target.apply(update(Some("act_2"), None)).unwrap();
        assert_eq!(target.campaign_id.as_deref(), Some("cmp_9"));
    }

    #[test]
    fn test_blank_values_clear() {
        let mut target = CrossPostTarget::default();
        target.apply(update(Some("act_1"), Some("cmp_1"))).unwrap();
        target.apply(update(None, Some("  "))).unwrap();
        assert!(target.campaign_id.is_none());
        assert_eq!(target.ad_account_id.as_deref(), Some("act_1"));
    }

    #[tokio::test]
    async fn test_campaigns_need_account_id() {
        let backend = FakeBackend::default();
        assert!(matches!(
            campaigns(&backend, " ").await,
            Err(AppError::Validation(_))
        ));
        assert!(backend.calls().is_empty());

        let list = campaigns(&backend, "act_1").await.unwrap();
        assert_eq!(list[0].id, "cmp_1");
        assert_eq!(backend.calls(), vec!["campaigns:act_1"]);
    }
}
