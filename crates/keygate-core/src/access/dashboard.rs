//! Dashboard view model: what an authenticated tier sees and what stays locked.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{AccessTier, QuickAction};
use crate::types::VerificationResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionStatus {
    pub action: QuickAction,
    pub label: &'static str,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub tier: AccessTier,
    pub label: &'static str,
    pub expires_at: Option<DateTime<Utc>>,
    pub features: Vec<&'static str>,
    pub locked: Vec<&'static str>,
    pub actions: Vec<ActionStatus>,
    /// Feature list reported by the server, shown as-is
    pub server_features: Option<Vec<String>>,
    pub message: Option<String>,
}

impl Dashboard {
    pub fn new(tier: AccessTier, result: &VerificationResult) -> Self {
        let profile = tier.profile();
        let actions = QuickAction::ALL
            .iter()
            .map(|&action| ActionStatus {
                action,
                label: action.display_name(),
                available: tier.can_use_action(action),
            })
            .collect();

        Self {
            tier,
            label: profile.label,
            expires_at: result.expiry(),
            features: profile.features.to_vec(),
            locked: profile.locked.to_vec(),
            actions,
            server_features: result.features.clone(),
            message: result.message.clone(),
        }
    }

    pub fn is_action_enabled(&self, action: QuickAction) -> bool {
        self.actions
            .iter()
            .any(|status| status.action == action && status.available)
    }

    pub fn enabled_actions(&self) -> Vec<QuickAction> {
        self.actions
            .iter()
            .filter(|status| status.available)
            .map(|status| status.action)
            .collect()
    }

    pub fn disabled_actions(&self) -> Vec<QuickAction> {
        self.actions
            .iter()
            .filter(|status| !status.available)
            .map(|status| status.action)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(tier: AccessTier) -> VerificationResult {
        VerificationResult {
            valid: true,
            tier: Some(tier),
            expires_at: None,
            features: None,
            message: None,
        }
    }

    #[test]
    fn test_pro_dashboard() {
        let dashboard = Dashboard::new(AccessTier::Pro, &valid(AccessTier::Pro));
        assert_eq!(dashboard.label, "Pro");
        assert!(dashboard.is_action_enabled(QuickAction::Transfer));
        assert!(dashboard.is_action_enabled(QuickAction::Analytics));
        assert!(dashboard.disabled_actions().is_empty());
        assert_eq!(dashboard.locked, vec!["Priority support", "API access"]);
        assert!(dashboard.features.contains(&"Unlimited transfers"));
    }

    #[test]
    fn test_free_dashboard_locks_paid_actions() {
        let dashboard = Dashboard::new(AccessTier::Free, &valid(AccessTier::Free));
        assert_eq!(
            dashboard.enabled_actions(),
            vec![QuickAction::Wallet, QuickAction::Settings]
        );
        assert_eq!(
            dashboard.disabled_actions(),
            vec![QuickAction::Transfer, QuickAction::Analytics]
        );
        assert!(dashboard.locked.contains(&"Analytics"));
    }

    #[test]
    fn test_enterprise_dashboard_has_nothing_locked() {
        let mut result = valid(AccessTier::Enterprise);
        result.expires_at = Some("2027-01-15T12:00:00+02:00".to_string());
        result.features = Some(vec!["custom".to_string()]);
        let dashboard = Dashboard::new(AccessTier::Enterprise, &result);
        assert!(dashboard.locked.is_empty());
        assert_eq!(dashboard.enabled_actions().len(), QuickAction::ALL.len());
        assert_eq!(
            dashboard.expires_at.map(|d| d.to_rfc3339()),
            Some("2027-01-15T10:00:00+00:00".to_string())
        );
        assert_eq!(dashboard.server_features, Some(vec!["custom".to_string()]));
    }
}
