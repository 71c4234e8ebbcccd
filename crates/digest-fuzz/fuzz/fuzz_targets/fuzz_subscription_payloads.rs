#![no_main]

use arxiv_digest::models::{CheckoutSession, DiscountApplied, DiscountCode, SubscriptionStatus};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = serde_json::from_value::<SubscriptionStatus>(json.clone());
        let _ = serde_json::from_value::<CheckoutSession>(json.clone());
        let _ = serde_json::from_value::<DiscountApplied>(json);
    }
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = DiscountCode::parse(text);
    }
});
