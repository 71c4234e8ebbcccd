//! Typed calls for each backend endpoint the view layer uses.

use reqwest::Method;
use serde_json::json;

use super::FetchGateway;
use crate::config::api;
use crate::error::GatewayResult;
use crate::models::{
    CheckoutSession, DiscountApplied, DiscountCode, ListFilter, PaperRecord, PlanId,
    SubscriptionStatus, SummaryRecord, SummaryResponse,
};

impl FetchGateway {
    /// List papers for a category. Public.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn list_papers(&self, filter: &ListFilter) -> GatewayResult<Vec<PaperRecord>> {
        let [api_seg, papers] = api::PAPERS;
        let mut url = self.url_for(&[api_seg, papers, ""])?;
        url.query_pairs_mut().extend_pairs(filter.query_pairs());

        let value = self.send(Method::GET, url, false, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Generate (or fetch) the summary for one paper.
    ///
    /// # Errors
    ///
    /// Returns error on missing credential or API failure.
    pub async fn paper_summary(&self, paper_id: &str) -> GatewayResult<SummaryRecord> {
        let [api_seg, papers] = api::PAPERS;
        let url = self.url_for(&[api_seg, papers, paper_id, "summary"])?;

        let value = self.send(Method::GET, url, true, None).await?;
        let response: SummaryResponse = serde_json::from_value(value)?;
        Ok(response.summary)
    }

    /// Flip the bookmark on a paper. The backend toggles; no body is sent.
    ///
    /// # Errors
    ///
    /// Returns error on missing credential or API failure.
    pub async fn toggle_bookmark(&self, paper_id: &str) -> GatewayResult<()> {
        let [api_seg, papers] = api::PAPERS;
        let url = self.url_for(&[api_seg, papers, paper_id, "bookmark"])?;

        self.send(Method::POST, url, true, None).await?;
        Ok(())
    }

    /// Current subscription tier.
    ///
    /// # Errors
    ///
    /// Returns error on missing credential or API failure.
    pub async fn subscription_status(&self) -> GatewayResult<SubscriptionStatus> {
        let url = self.subscriptions_url("subscription-status")?;

        let value = self.send(Method::GET, url, true, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create a checkout session for a plan.
    ///
    /// # Errors
    ///
    /// Returns error on missing credential or API failure.
    pub async fn create_subscription(&self, plan: PlanId) -> GatewayResult<CheckoutSession> {
        let url = self.subscriptions_url("create-subscription")?;
        let body = json!({ "plan": plan.as_str() });

        let value = self.send(Method::POST, url, true, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Apply a discount code to the user's subscription.
    ///
    /// # Errors
    ///
    /// Returns error on missing credential or API failure.
    pub async fn apply_discount(&self, code: &DiscountCode) -> GatewayResult<DiscountApplied> {
        let url = self.subscriptions_url("apply-discount")?;
        let body = json!({ "code": code.as_str() });

        let value = self.send(Method::POST, url, true, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Cancel the current subscription.
    ///
    /// # Errors
    ///
    /// Returns error on missing credential or API failure.
    pub async fn cancel_subscription(&self) -> GatewayResult<()> {
        let url = self.subscriptions_url("cancel-subscription")?;

        self.send(Method::POST, url, true, None).await?;
        Ok(())
    }

    fn subscriptions_url(&self, action: &str) -> GatewayResult<url::Url> {
        let [api_seg, subscriptions] = api::SUBSCRIPTIONS;
        self.url_for(&[api_seg, subscriptions, action])
    }
}
