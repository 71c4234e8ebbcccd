//! Application wiring: owns the gateway, the controllers and the collaborators,
//! and turns UI events into controller calls.

use std::collections::HashMap;
use std::sync::Arc;

use crate::collab::{CheckoutRedirect, LoginPrompt, NoopCheckout, NoopLoginPrompt, NullSurface, Surface};
use crate::config::Config;
use crate::error::{GatewayError, ViewError, ViewResult};
use crate::gateway::FetchGateway;
use crate::models::{ListFilter, PlanId};
use crate::render;
use crate::store::{CredentialStore, KeyValueStore, MemoryStore};
use crate::view::{
    BookmarkController, ListRefreshCoordinator, Notice, SubscriptionController, ToggleController, ViewContext,
};

/// Shown when a bookmark toggle fails for any reason other than a missing login.
pub const BOOKMARK_FAILURE_MESSAGE: &str = "Failed to update bookmark. Please try again.";

/// A user interaction, decoded from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Category or page size changed.
    FilterChanged(ListFilter),
    /// Refresh button.
    Refresh,
    /// Card summary button (also the retry button).
    ToggleSummary { paper_id: String },
    /// Hide an expanded summary.
    CollapseSummary { paper_id: String },
    ToggleBookmark { paper_id: String },
    Subscribe(PlanId),
    ApplyDiscount { code: String },
    CancelSubscription,
    Login { token: String },
    Logout,
}

/// The paper browser.
#[derive(Debug)]
pub struct App {
    ctx: ViewContext,
    list: ListRefreshCoordinator,
    toggles: ToggleController,
    bookmarks: BookmarkController,
    subscriptions: SubscriptionController,
}

impl App {
    /// Start building an app from configuration.
    #[must_use]
    pub fn builder(config: Config) -> AppBuilder {
        AppBuilder::new(config)
    }

    /// Shared view context.
    #[must_use]
    pub const fn context(&self) -> &ViewContext {
        &self.ctx
    }

    /// Initial load: the paper list and the subscription status, concurrently.
    pub async fn start(&self) {
        let (list, _) = futures::join!(self.list.refresh(&self.ctx), self.subscriptions.load_status(&self.ctx));
        if let Err(err) = list {
            self.report("refresh", &err).await;
        }
    }

    /// Dispatch one event. Errors are logged and shown as a notice, never returned.
    pub async fn handle(&self, event: UiEvent) {
        let name = event.name();
        tracing::debug!(event = name, "handling event");

        if let Err(err) = self.dispatch(event).await {
            self.report(name, &err).await;
        }
    }

    /// Map a rendered `data-action` and its `data-*` attributes back to an event.
    ///
    /// Attribute keys may be given with or without the `data-` prefix.
    #[must_use]
    pub fn bind(action: &str, attrs: &HashMap<String, String>) -> Option<UiEvent> {
        let attr = |key: &str| {
            attrs
                .get(key)
                .or_else(|| attrs.get(&format!("data-{key}")))
                .map(String::as_str)
        };
        let paper_id = || attr("paper-id").filter(|id| !id.is_empty()).map(str::to_string);

        let event = match action {
            "refresh" => UiEvent::Refresh,
            "filter" => {
                let category = attr("category")?;
                let max_results = attr("max_results")?.trim().parse().ok()?;
                UiEvent::FilterChanged(ListFilter::new(category, max_results))
            }
            "toggle-summary" => UiEvent::ToggleSummary { paper_id: paper_id()? },
            "collapse-summary" => UiEvent::CollapseSummary { paper_id: paper_id()? },
            "toggle-bookmark" => UiEvent::ToggleBookmark { paper_id: paper_id()? },
            "subscribe" => UiEvent::Subscribe(attr("plan")?.parse().ok()?),
            "apply-discount" => UiEvent::ApplyDiscount { code: attr("code").unwrap_or_default().to_string() },
            "cancel-subscription" => UiEvent::CancelSubscription,
            "login" => UiEvent::Login { token: attr("token").unwrap_or_default().to_string() },
            "logout" => UiEvent::Logout,
            other => {
                tracing::debug!(action = other, "unbound action");
                return None;
            }
        };
        Some(event)
    }

    /// Store a bearer token, then reload the status and the list.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank token.
    pub async fn login(&self, token: &str) -> ViewResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ViewError::validation("token", "Please enter a token"));
        }
        self.ctx.gateway.credentials().set(token.to_string()).await;
        tracing::info!("logged in");

        let (list, _) = futures::join!(self.list.refresh(&self.ctx), self.subscriptions.load_status(&self.ctx));
        list.map(|_| ())
    }

    /// Drop the credential and everything tied to the session.
    pub async fn logout(&self) {
        self.ctx.gateway.credentials().clear().await;
        self.subscriptions.clear(&self.ctx).await;
        tracing::info!("logged out");
    }

    /// Render the whole page from the current state.
    pub async fn render_page(&self) -> String {
        let state = self.ctx.state().await;
        render::render_page(&state)
    }

    async fn dispatch(&self, event: UiEvent) -> ViewResult<()> {
        match event {
            UiEvent::FilterChanged(filter) => {
                self.ctx.set_notice(None).await;
                self.list.set_filter(&self.ctx, filter).await.map(|_| ())
            }
            UiEvent::Refresh => {
                self.ctx.set_notice(None).await;
                self.list.refresh(&self.ctx).await.map(|_| ())
            }
            UiEvent::ToggleSummary { paper_id } => {
                self.toggles.toggle(&self.ctx, &paper_id).await;
                Ok(())
            }
            UiEvent::CollapseSummary { paper_id } => {
                self.toggles.collapse(&self.ctx, &paper_id).await;
                Ok(())
            }
            UiEvent::ToggleBookmark { paper_id } => {
                self.bookmarks.toggle(&self.ctx, &paper_id).await.map(|_| ())
            }
            UiEvent::Subscribe(plan) => self.subscriptions.subscribe(&self.ctx, plan).await.map(|_| ()),
            UiEvent::ApplyDiscount { code } => {
                self.subscriptions.apply_discount(&self.ctx, &code).await.map(|_| ())
            }
            UiEvent::CancelSubscription => self.subscriptions.cancel(&self.ctx).await,
            UiEvent::Login { token } => self.login(&token).await,
            UiEvent::Logout => {
                self.logout().await;
                Ok(())
            }
        }
    }

    /// Log a failed event and surface it. A missing login already raised the
    /// prompt, so it gets no notice. Rejected input is a warning; nothing was sent.
    async fn report(&self, event: &str, err: &ViewError) {
        tracing::warn!(event, error = %err, "event failed");
        if matches!(err, ViewError::Gateway(GatewayError::Unauthenticated)) {
            return;
        }
        let notice = match (event, err) {
            ("toggle_bookmark", ViewError::Gateway(_)) => Notice::error(BOOKMARK_FAILURE_MESSAGE),
            (_, ViewError::Validation { .. }) => Notice::warning(err.to_user_message()),
            _ => Notice::error(err.to_user_message()),
        };
        self.ctx.set_notice(Some(notice)).await;
    }
}

impl UiEvent {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FilterChanged(_) => "filter_changed",
            Self::Refresh => "refresh",
            Self::ToggleSummary { .. } => "toggle_summary",
            Self::CollapseSummary { .. } => "collapse_summary",
            Self::ToggleBookmark { .. } => "toggle_bookmark",
            Self::Subscribe(_) => "subscribe",
            Self::ApplyDiscount { .. } => "apply_discount",
            Self::CancelSubscription => "cancel_subscription",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
        }
    }
}

/// Builder for [`App`]. Collaborators that are not set fall back to
/// in-memory or no-op versions.
pub struct AppBuilder {
    config: Config,
    store: Option<Arc<dyn KeyValueStore>>,
    login_prompt: Option<Arc<dyn LoginPrompt>>,
    checkout: Option<Arc<dyn CheckoutRedirect>>,
    surface: Option<Arc<dyn Surface>>,
}

impl AppBuilder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config, store: None, login_prompt: None, checkout: None, surface: None }
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn login_prompt(mut self, prompt: Arc<dyn LoginPrompt>) -> Self {
        self.login_prompt = Some(prompt);
        self
    }

    #[must_use]
    pub fn checkout(mut self, checkout: Arc<dyn CheckoutRedirect>) -> Self {
        self.checkout = Some(checkout);
        self
    }

    #[must_use]
    pub fn surface(mut self, surface: Arc<dyn Surface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Build the app.
    ///
    /// # Errors
    ///
    /// Returns error if the gateway cannot be created from the configuration.
    pub fn build(self) -> anyhow::Result<App> {
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let credentials = CredentialStore::new(store, self.config.credential_key.clone());
        let login_prompt = self.login_prompt.unwrap_or_else(|| Arc::new(NoopLoginPrompt));
        let gateway = FetchGateway::new(&self.config, credentials, login_prompt)?;

        let ctx = ViewContext::new(
            gateway,
            self.checkout.unwrap_or_else(|| Arc::new(NoopCheckout)),
            self.surface.unwrap_or_else(|| Arc::new(NullSurface)),
            self.config.default_filter.clone(),
        );

        tracing::debug!(api = %self.config.api_base_url, "app built");
        Ok(App {
            ctx,
            list: ListRefreshCoordinator,
            toggles: ToggleController,
            bookmarks: BookmarkController,
            subscriptions: SubscriptionController,
        })
    }
}

impl std::fmt::Debug for AppBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppBuilder").field("config", &self.config).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_bind_card_actions() {
        let a = attrs(&[("data-paper-id", "2401.1")]);
        assert_eq!(
            App::bind("toggle-summary", &a),
            Some(UiEvent::ToggleSummary { paper_id: "2401.1".into() })
        );
        assert_eq!(
            App::bind("toggle-bookmark", &a),
            Some(UiEvent::ToggleBookmark { paper_id: "2401.1".into() })
        );
        assert_eq!(App::bind("toggle-summary", &attrs(&[])), None);
        assert_eq!(App::bind("toggle-summary", &attrs(&[("paper-id", "")])), None);
    }

    #[test]
    fn test_bind_filter() {
        let a = attrs(&[("category", "cs.AI"), ("max_results", "5")]);
        assert_eq!(App::bind("filter", &a), Some(UiEvent::FilterChanged(ListFilter::new("cs.AI", 5))));
        let bad = attrs(&[("category", "cs.AI"), ("max_results", "lots")]);
        assert_eq!(App::bind("filter", &bad), None);
    }

    #[test]
    fn test_bind_subscription_actions() {
        assert_eq!(
            App::bind("subscribe", &attrs(&[("data-plan", "premium")])),
            Some(UiEvent::Subscribe(PlanId::Premium))
        );
        assert_eq!(App::bind("subscribe", &attrs(&[("plan", "gold")])), None);
        assert_eq!(
            App::bind("apply-discount", &attrs(&[])),
            Some(UiEvent::ApplyDiscount { code: String::new() })
        );
        assert_eq!(App::bind("cancel-subscription", &attrs(&[])), Some(UiEvent::CancelSubscription));
    }

    #[test]
    fn test_bind_unknown_action() {
        assert_eq!(App::bind("launch-missiles", &attrs(&[])), None);
    }

    #[tokio::test]
    async fn test_login_rejects_blank_token() {
        let app = App::builder(Config::for_testing("http://127.0.0.1:9")).build().unwrap();
        let err = app.login("   ").await.unwrap_err();
        assert!(matches!(err, ViewError::Validation { .. }));
        assert!(!app.context().gateway.credentials().is_present().await);
    }

    #[tokio::test]
    async fn test_rejected_input_is_a_warning() {
        let app = App::builder(Config::for_testing("http://127.0.0.1:9")).build().unwrap();
        app.handle(UiEvent::Login { token: String::new() }).await;
        let notice = app.context().state().await.notice.clone().unwrap();
        assert_eq!(notice.kind, crate::view::NoticeKind::Warning);
        assert_eq!(notice.message, "Please enter a token");
    }

    #[tokio::test]
    async fn test_logout_clears_credential() {
        let app = App::builder(Config::for_testing("http://127.0.0.1:9")).build().unwrap();
        app.context().gateway.credentials().set("tok".into()).await;
        app.logout().await;
        assert!(!app.context().gateway.credentials().is_present().await);
        assert_eq!(app.context().state().await.subscription.tier, None);
    }
}
