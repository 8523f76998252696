//! ============================================================================
//! Access Types - Key-gated access tiers and dashboard actions
//! ============================================================================
//! Defines the tiers returned by the verification service and the static
//! tables that decide which features each tier unlocks.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Access tiers reported by the verification service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    /// Minimal feature set
    Free,
    /// Transfers and analytics unlocked
    Pro,
    /// Everything unlocked
    Enterprise,
}

impl AccessTier {
    /// All tiers, lowest first
    pub const ALL: [AccessTier; 3] = [AccessTier::Free, AccessTier::Pro, AccessTier::Enterprise];

    /// Parse the wire representation. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "free" => Some(AccessTier::Free),
            "pro" => Some(AccessTier::Pro),
            "enterprise" => Some(AccessTier::Enterprise),
            _ => None,
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Free => "free",
            AccessTier::Pro => "pro",
            AccessTier::Enterprise => "enterprise",
        }
    }

    /// Get human-readable tier name
    pub fn display_name(&self) -> &'static str {
        self.profile().label
    }

    /// Short tagline used on the entry screen tier cards
    pub fn tagline(&self) -> &'static str {
        match self {
            AccessTier::Free => "Basic",
            AccessTier::Pro => "Enhanced",
            AccessTier::Enterprise => "Full suite",
        }
    }

    /// Whether this is a paid tier
    pub fn is_paid(&self) -> bool {
        *self != AccessTier::Free
    }

    /// Static feature table for this tier
    pub fn profile(&self) -> &'static TierProfile {
        match self {
            AccessTier::Free => &FREE_PROFILE,
            AccessTier::Pro => &PRO_PROFILE,
            AccessTier::Enterprise => &ENTERPRISE_PROFILE,
        }
    }

    /// Check if this tier can use a dashboard action
    pub fn can_use_action(&self, action: QuickAction) -> bool {
        *self >= action.required_tier()
    }

    fn rank(&self) -> u8 {
        match self {
            AccessTier::Free => 0,
            AccessTier::Pro => 1,
            AccessTier::Enterprise => 2,
        }
    }
}

impl PartialOrd for AccessTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AccessTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessTier::parse(s).ok_or_else(|| {
            format!("Unknown tier '{}'. Valid values: free, pro, enterprise", s)
        })
    }
}

/// Named features enabled and locked for a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierProfile {
    pub label: &'static str,
    pub features: &'static [&'static str],
    pub locked: &'static [&'static str],
}

static FREE_PROFILE: TierProfile = TierProfile {
    label: "Free",
    features: &["Basic wallet tracking", "Daily limit", "Community support"],
    locked: &["Analytics", "Unlimited transfers", "Priority support", "API access"],
};

static PRO_PROFILE: TierProfile = TierProfile {
    label: "Pro",
    features: &["Wallet tracking", "Unlimited transfers", "Analytics", "Community support"],
    locked: &["Priority support", "API access"],
};

static ENTERPRISE_PROFILE: TierProfile = TierProfile {
    label: "Enterprise",
    features: &[
        "All features unlocked",
        "Priority support",
        "Full API access",
        "Custom integrations",
    ],
    locked: &[],
};

/// Dashboard quick actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    Wallet,
    Transfer,
    Analytics,
    Settings,
}

impl QuickAction {
    /// Dashboard order
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Wallet,
        QuickAction::Transfer,
        QuickAction::Analytics,
        QuickAction::Settings,
    ];

    /// Get the minimum tier required for this action
    pub fn required_tier(&self) -> AccessTier {
        match self {
            QuickAction::Wallet | QuickAction::Settings => AccessTier::Free,
            QuickAction::Transfer | QuickAction::Analytics => AccessTier::Pro,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            QuickAction::Wallet => "Wallet",
            QuickAction::Transfer => "Transfer",
            QuickAction::Analytics => "Analytics",
            QuickAction::Settings => "Settings",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse() {
        assert_eq!(AccessTier::parse("free"), Some(AccessTier::Free));
        assert_eq!(AccessTier::parse("PRO"), Some(AccessTier::Pro));
        assert_eq!(AccessTier::parse(" enterprise "), Some(AccessTier::Enterprise));
        assert_eq!(AccessTier::parse("platinum"), None);
        assert!("gold".parse::<AccessTier>().is_err());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(AccessTier::Free < AccessTier::Pro);
        assert!(AccessTier::Pro < AccessTier::Enterprise);
        assert!(!AccessTier::Free.is_paid());
        assert!(AccessTier::Pro.is_paid());
    }

    #[test]
    fn test_action_access() {
        assert!(AccessTier::Free.can_use_action(QuickAction::Wallet));
        assert!(AccessTier::Free.can_use_action(QuickAction::Settings));
        assert!(!AccessTier::Free.can_use_action(QuickAction::Transfer));
        assert!(!AccessTier::Free.can_use_action(QuickAction::Analytics));
        assert!(AccessTier::Pro.can_use_action(QuickAction::Transfer));
        assert!(AccessTier::Pro.can_use_action(QuickAction::Analytics));
        assert!(AccessTier::Enterprise.can_use_action(QuickAction::Analytics));
    }

    #[test]
    fn test_profiles() {
        assert_eq!(
            AccessTier::Pro.profile().locked,
            &["Priority support", "API access"]
        );
        assert_eq!(AccessTier::Free.profile().locked.len(), 4);
        assert!(AccessTier::Enterprise.profile().locked.is_empty());
        assert_eq!(AccessTier::Enterprise.display_name(), "Enterprise");
    }

    #[test]
    fn test_tier_serde() {
        let json = serde_json::to_string(&AccessTier::Enterprise).unwrap();
        assert_eq!(json, "\"enterprise\"");
        let tier: AccessTier = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(tier, AccessTier::Pro);
    }
}
