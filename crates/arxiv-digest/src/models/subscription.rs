//! Subscription tiers, the plan catalog and subscription endpoint payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subscription tier of the logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[serde(alias = "FREE")]
    Free,
    #[serde(alias = "BASIC")]
    Basic,
    #[serde(alias = "PREMIUM")]
    Premium,
}

impl SubscriptionTier {
    /// The purchasable plan matching this tier, if any.
    #[must_use]
    pub const fn plan(self) -> Option<PlanId> {
        match self {
            Self::Free => None,
            Self::Basic => Some(PlanId::Basic),
            Self::Premium => Some(PlanId::Premium),
        }
    }
}

/// Identifier of a purchasable plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Basic,
    Premium,
}

impl PlanId {
    /// Wire name sent as `{"plan": ...}`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
        }
    }

    /// Catalog entry for this plan.
    #[must_use]
    pub fn plan(self) -> &'static Plan {
        match self {
            Self::Basic => &PLANS[0],
            Self::Premium => &PLANS[1],
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            other => Err(format!("unknown plan: {other}")),
        }
    }
}

/// A plan as shown on the subscription page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    /// Monthly price in cents.
    pub price_cents: u32,
    pub features: &'static [&'static str],
}

impl Plan {
    /// Monthly price after a percentage discount, rounded to the nearest cent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn discounted_cents(&self, discount_percentage: Option<f64>) -> u32 {
        let Some(pct) = discount_percentage else {
            return self.price_cents;
        };
        let pct = pct.clamp(0.0, 100.0);
        let price = f64::from(self.price_cents) * (100.0 - pct) / 100.0;
        // clamped above, so the result is within 0..=price_cents
        price.round() as u32
    }
}

/// Formats cents as `$D.CC`.
#[must_use]
pub fn format_price(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// The plan catalog, in display order.
pub static PLANS: [Plan; 2] = [
    Plan {
        id: PlanId::Basic,
        name: "Basic Plan",
        price_cents: 999,
        features: &["5 paper summaries per day", "Basic categories", "Email notifications"],
    },
    Plan {
        id: PlanId::Premium,
        name: "Premium Plan",
        price_cents: 1999,
        features: &[
            "Unlimited paper summaries",
            "All categories",
            "Priority updates",
            "API access",
            "Custom preferences",
        ],
    },
];

/// `GET /subscription-status` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionStatus {
    #[serde(default)]
    pub subscription_tier: Option<SubscriptionTier>,
}

/// `POST /create-subscription` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// `POST /apply-discount` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountApplied {
    pub discount_percentage: f64,
}
