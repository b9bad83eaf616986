//! Mock ad platform for testing.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use adgate_meta::{AdPlatform, MetaError, MetaResult};

/// A scripted [`AdPlatform`] that records every call.
///
/// Calls targeting an object id registered via
/// [`fail_object`](Self::fail_object) return a platform-style error; all
/// others succeed.
#[derive(Default)]
pub struct MockAdPlatform {
    failing_objects: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockAdPlatform {
    /// Create a platform where every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make calls against `object_id` fail from now on.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_object(&self, object_id: impl Into<String>) {
        self.failing_objects
            .lock()
            .expect("lock poisoned")
            .insert(object_id.into());
    }

    /// Every call made so far, as `"<op>:<object_id>"` strings in call
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Number of calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock poisoned").len()
    }

    fn record(&self, op: &str, object_id: &str) -> MetaResult<()> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(format!("{op}:{object_id}"));

        if self
            .failing_objects
            .lock()
            .expect("lock poisoned")
            .contains(object_id)
        {
            Err(MetaError::ApiRequestFailed {
                status: 400,
                message: format!("(#100) Invalid parameter for object {object_id}"),
            })
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for MockAdPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAdPlatform").finish_non_exhaustive()
    }
}

#[async_trait]
impl AdPlatform for MockAdPlatform {
    async fn pause_campaign(&self, campaign_id: &str) -> MetaResult<()> {
        self.record("pause_campaign", campaign_id)
    }

    async fn enable_campaign(&self, campaign_id: &str) -> MetaResult<()> {
        self.record("enable_campaign", campaign_id)
    }

    async fn set_campaign_daily_budget(&self, campaign_id: &str, _budget: f64) -> MetaResult<()> {
        self.record("set_campaign_daily_budget", campaign_id)
    }

    async fn set_adset_bid(&self, adset_id: &str, _bid: f64) -> MetaResult<()> {
        self.record("set_adset_bid", adset_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_carry_full_operation_names() {
        let platform = MockAdPlatform::new();

        platform.pause_campaign("c1").await.unwrap();
        platform.enable_campaign("c2").await.unwrap();
        platform.set_campaign_daily_budget("c3", 150.0).await.unwrap();
        platform.set_adset_bid("a1", 2.5).await.unwrap();

        assert_eq!(
            platform.calls(),
            vec![
                "pause_campaign:c1".to_string(),
                "enable_campaign:c2".to_string(),
                "set_campaign_daily_budget:c3".to_string(),
                "set_adset_bid:a1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_object_still_recorded() {
        let platform = MockAdPlatform::new();
        platform.fail_object("c-bad");

        let err = platform.pause_campaign("c-bad").await.unwrap_err();
        assert!(matches!(err, MetaError::ApiRequestFailed { status: 400, .. }));
        assert_eq!(platform.calls(), vec!["pause_campaign:c-bad".to_string()]);
    }
}
