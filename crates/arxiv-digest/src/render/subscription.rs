//! Plan cards and the discount form.

use super::html::escape;
use crate::models::{PLANS, Plan, SubscriptionTier, format_price};
use crate::view::SubscriptionView;

/// Render the subscription panel: one card per plan, then the discount form.
#[must_use]
pub fn render_subscription(view: &SubscriptionView) -> String {
    let cards: String = PLANS.iter().map(|plan| render_plan_card(plan, view)).collect();
    format!(
        r#"<div class="plans">{cards}</div>
{discount}"#,
        discount = render_discount_section(view.discount),
    )
}

/// One plan card. The user's current plan is disabled and offers cancellation.
#[must_use]
pub fn render_plan_card(plan: &Plan, view: &SubscriptionView) -> String {
    let current = view.tier.and_then(SubscriptionTier::plan) == Some(plan.id);
    let discounted = plan.discounted_cents(view.discount);
    let price = if discounted == plan.price_cents {
        format!(r#"<span class="price">{}</span>"#, format_price(plan.price_cents))
    } else {
        format!(
            r#"<span class="price original"><s>{}</s></span> <span class="price">{}</span>"#,
            format_price(plan.price_cents),
            format_price(discounted)
        )
    };
    let features: String =
        plan.features.iter().map(|f| format!("<li>{}</li>", escape(f))).collect();
    let button = if current {
        r#"<button class="btn btn-plan" disabled>Current Plan</button>
<button class="btn btn-cancel" data-action="cancel-subscription">Cancel subscription</button>"#
            .to_string()
    } else {
        format!(
            r#"<button class="btn btn-plan" data-action="subscribe" data-plan="{}">Subscribe Now</button>"#,
            plan.id
        )
    };
    let class = if current { "plan-card current" } else { "plan-card" };

    format!(
        r#"<div class="{class}" data-plan="{id}">
<h3>{name}</h3>
<p>{price}<span class="period">/month</span></p>
<ul class="features">{features}</ul>
{button}
</div>"#,
        id = plan.id,
        name = escape(plan.name),
    )
}

/// Discount code form, with a badge once a discount is applied.
#[must_use]
pub fn render_discount_section(discount: Option<f64>) -> String {
    let applied = discount
        .map(|pct| format!(r#"<p class="discount-applied">{pct}% discount applied</p>"#))
        .unwrap_or_default();
    format!(
        r#"<div class="discount-section">
<input type="text" name="code" placeholder="Discount code" maxlength="32">
<button class="btn" data-action="apply-discount">Apply</button>
{applied}</div>"#
    )
}
