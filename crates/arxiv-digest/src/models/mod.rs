//! Data models for the digest backend's payloads.
//!
//! Records are immutable once decoded; a refresh replaces them wholesale.

mod inputs;
mod paper;
mod subscription;

pub use inputs::{DiscountCode, ListFilter};
pub use paper::{PaperRecord, SummaryRecord, SummaryResponse};
pub use subscription::{
    CheckoutSession, DiscountApplied, PLANS, Plan, PlanId, SubscriptionStatus, SubscriptionTier,
    format_price,
};
