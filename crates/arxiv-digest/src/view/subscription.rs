//! Subscription status, checkout hand-off and discount codes.

use super::{Notice, ViewContext};
use crate::error::{GatewayError, ViewError, ViewResult};
use crate::models::{DiscountCode, PlanId, SubscriptionTier};

/// Subscription panel state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionView {
    /// Current tier; `None` when logged out or unknown.
    pub tier: Option<SubscriptionTier>,
    /// Discount percentage applied by a code.
    pub discount: Option<f64>,
}

/// Drives the subscription panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptionController;

impl SubscriptionController {
    /// Load the tier. Logged out or failing calls leave the tier unknown; no prompt.
    pub async fn load_status(&self, ctx: &ViewContext) -> Option<SubscriptionTier> {
        let tier = if ctx.gateway.credentials().is_present().await {
            match ctx.gateway.subscription_status().await {
                Ok(status) => status.subscription_tier,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to get subscription status");
                    None
                }
            }
        } else {
            None
        };

        ctx.state_mut().await.subscription.tier = tier;
        ctx.render_subscription().await;
        tier
    }

    /// Start checkout for a plan and hand the session to the payment processor.
    pub async fn subscribe(&self, ctx: &ViewContext, plan: PlanId) -> ViewResult<String> {
        Self::require_login(ctx).await?;

        {
            let state = ctx.state().await;
            if state.subscription.tier.and_then(SubscriptionTier::plan) == Some(plan) {
                return Err(ViewError::validation("plan", "You are already on this plan"));
            }
        }

        let session_id = Self::run_exclusive(ctx, async {
            let session = ctx.gateway.create_subscription(plan).await?;
            tracing::info!(plan = %plan, session_id = %session.session_id, "redirecting to checkout");
            ctx.checkout
                .redirect_to_checkout(&session.session_id)
                .await
                .map_err(ViewError::Checkout)?;
            Ok::<_, ViewError>(session.session_id)
        })
        .await?;

        Ok(session_id)
    }

    /// Apply a discount code. On any failure the subscription state is unchanged.
    pub async fn apply_discount(&self, ctx: &ViewContext, raw_code: &str) -> ViewResult<f64> {
        Self::require_login(ctx).await?;
        let code = DiscountCode::parse(raw_code)?;

        let percentage = Self::run_exclusive(ctx, async {
            let applied = ctx.gateway.apply_discount(&code).await?;
            Ok::<_, ViewError>(applied.discount_percentage)
        })
        .await?;

        ctx.state_mut().await.subscription.discount = Some(percentage);
        ctx.set_notice(Some(Notice::success(format!(
            "Discount applied! You'll save {}% on your subscription.",
            format_percentage(percentage)
        ))))
        .await;
        ctx.render_subscription().await;
        Ok(percentage)
    }

    /// Cancel the subscription; the tier drops to free.
    pub async fn cancel(&self, ctx: &ViewContext) -> ViewResult<()> {
        Self::require_login(ctx).await?;

        Self::run_exclusive(ctx, async {
            ctx.gateway.cancel_subscription().await?;
            Ok::<_, ViewError>(())
        })
        .await?;

        ctx.state_mut().await.subscription.tier = Some(SubscriptionTier::Free);
        ctx.render_subscription().await;
        Ok(())
    }

    /// Forget everything tied to the previous session.
    pub async fn clear(&self, ctx: &ViewContext) {
        ctx.state_mut().await.subscription = SubscriptionView::default();
        ctx.render_subscription().await;
    }

    async fn require_login(ctx: &ViewContext) -> ViewResult<()> {
        if ctx.gateway.credentials().is_present().await {
            return Ok(());
        }
        ctx.gateway.prompt_login();
        Err(GatewayError::Unauthenticated.into())
    }

    /// Run one subscription call with the spinner up; a second call while one
    /// is running is refused.
    async fn run_exclusive<T>(
        ctx: &ViewContext,
        call: impl std::future::Future<Output = ViewResult<T>>,
    ) -> ViewResult<T> {
        {
            let mut state = ctx.state_mut().await;
            if state.subscription_busy {
                return Err(ViewError::validation(
                    "subscription",
                    "Another subscription request is still running",
                ));
            }
            state.subscription_busy = true;
        }
        ctx.sync_loading().await;

        let result = call.await;

        ctx.state_mut().await.subscription_busy = false;
        ctx.sync_loading().await;
        result
    }
}

/// `20.0` -> `20`, `12.5` -> `12.5`.
fn format_percentage(pct: f64) -> String {
    let text = format!("{pct:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(20.0), "20");
        assert_eq!(format_percentage(12.5), "12.5");
        assert_eq!(format_percentage(33.333), "33.33");
        assert_eq!(format_percentage(0.0), "0");
    }
}
