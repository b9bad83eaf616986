//! The ad platform write interface.

use async_trait::async_trait;

use crate::error::MetaResult;

/// The four campaign mutations the executor may perform.
///
/// Arguments arrive in currency major units; implementations own the
/// conversion to whatever unit the platform expects. Implementations do not
/// retry: a failure is reported once, and resurfacing the change is a fresh
/// approval cycle.
#[async_trait]
pub trait AdPlatform: Send + Sync {
    /// Pause a running campaign.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the update or the request
    /// fails in transit.
    async fn pause_campaign(&self, campaign_id: &str) -> MetaResult<()>;

    /// Re-enable a paused campaign.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the update or the request
    /// fails in transit.
    async fn enable_campaign(&self, campaign_id: &str) -> MetaResult<()>;

    /// Set a campaign's daily budget, in currency major units.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the update or the request
    /// fails in transit.
    async fn set_campaign_daily_budget(&self, campaign_id: &str, budget: f64) -> MetaResult<()>;

    /// Set an ad set's bid, in currency major units.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the update or the request
    /// fails in transit.
    async fn set_adset_bid(&self, adset_id: &str, bid: f64) -> MetaResult<()>;
}

#[async_trait]
impl<T: AdPlatform + ?Sized> AdPlatform for Box<T> {
    async fn pause_campaign(&self, campaign_id: &str) -> MetaResult<()> {
        (**self).pause_campaign(campaign_id).await
    }

    async fn enable_campaign(&self, campaign_id: &str) -> MetaResult<()> {
        (**self).enable_campaign(campaign_id).await
    }

    async fn set_campaign_daily_budget(&self, campaign_id: &str, budget: f64) -> MetaResult<()> {
        (**self).set_campaign_daily_budget(campaign_id, budget).await
    }

    async fn set_adset_bid(&self, adset_id: &str, bid: f64) -> MetaResult<()> {
        (**self).set_adset_bid(adset_id, bid).await
    }
}
