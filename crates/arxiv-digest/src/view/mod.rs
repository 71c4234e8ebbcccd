//! View-state controllers.
//!
//! Each controller mutates the shared [`ViewState`] behind one lock and then
//! re-renders the affected region. The lock is never held across a fetch:
//! controllers take a ticket, release the lock, await the gateway, and
//! re-acquire the lock to apply the result only if the ticket is still current.

mod bookmark;
mod refresh;
mod subscription;
mod toggle;

pub use bookmark::{BookmarkController, BookmarkOutcome};
pub use refresh::{ListRefreshCoordinator, ListSlot, ListView, RefreshOutcome};
pub use subscription::{SubscriptionController, SubscriptionView};
pub use toggle::{CardSlots, CardViewState, ExpandTicket, ToggleController, ToggleOutcome};

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::collab::{CheckoutRedirect, Region, Surface};
use crate::gateway::FetchGateway;
use crate::models::ListFilter;
use crate::render;

/// Severity of an inline notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Warning,
    Success,
}

/// Inline message shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Warning, message: message.into() }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }
}

/// Everything the page shows. Owned by [`ViewContext`], never global.
#[derive(Debug)]
pub struct ViewState {
    pub filter: ListFilter,
    pub list: ListSlot,
    pub cards: CardSlots,
    pub bookmarks_in_flight: HashSet<String>,
    pub notice: Option<Notice>,
    pub subscription: SubscriptionView,
    pub subscription_busy: bool,
}

impl ViewState {
    #[must_use]
    pub fn new(filter: ListFilter) -> Self {
        Self {
            filter,
            list: ListSlot::default(),
            cards: CardSlots::default(),
            bookmarks_in_flight: HashSet::new(),
            notice: None,
            subscription: SubscriptionView::default(),
            subscription_busy: false,
        }
    }

    /// The global spinner is up while the latest list fetch or a subscription call runs.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.list.loading || self.subscription_busy
    }
}

/// Shared context handed to every controller.
pub struct ViewContext {
    pub gateway: FetchGateway,
    pub checkout: Arc<dyn CheckoutRedirect>,
    surface: Arc<dyn Surface>,
    state: RwLock<ViewState>,
}

impl ViewContext {
    #[must_use]
    pub fn new(
        gateway: FetchGateway,
        checkout: Arc<dyn CheckoutRedirect>,
        surface: Arc<dyn Surface>,
        filter: ListFilter,
    ) -> Self {
        Self { gateway, checkout, surface, state: RwLock::new(ViewState::new(filter)) }
    }

    /// Read-only access to the current state.
    pub async fn state(&self) -> tokio::sync::RwLockReadGuard<'_, ViewState> {
        self.state.read().await
    }

    /// Mutate state. Callers must drop the guard before awaiting the gateway.
    pub(crate) async fn state_mut(&self) -> tokio::sync::RwLockWriteGuard<'_, ViewState> {
        self.state.write().await
    }

    /// Set (or clear) the notice and re-render it.
    pub async fn set_notice(&self, notice: Option<Notice>) {
        self.state_mut().await.notice = notice;
        self.render_notices().await;
    }

    pub(crate) async fn render_list(&self) {
        let markup = {
            let state = self.state().await;
            render::render_list(&state.list.view, &state.cards)
        };
        self.surface.replace(&Region::Papers, &markup);
    }

    /// Re-render one card; a card that is not in the displayed list is skipped.
    pub(crate) async fn render_card(&self, paper_id: &str) {
        let markup = {
            let state = self.state().await;
            let Some(paper) = state.list.view.paper(paper_id) else {
                return;
            };
            render::render_card(paper, &state.cards.get(paper_id))
        };
        self.surface.replace(&Region::Card(paper_id.to_string()), &markup);
    }

    pub(crate) async fn render_notices(&self) {
        let markup = {
            let state = self.state().await;
            render::render_notice(state.notice.as_ref())
        };
        self.surface.replace(&Region::Notices, &markup);
    }

    pub(crate) async fn render_subscription(&self) {
        let markup = {
            let state = self.state().await;
            render::render_subscription(&state.subscription)
        };
        self.surface.replace(&Region::Subscription, &markup);
    }

    pub(crate) async fn sync_loading(&self) {
        let loading = self.state().await.loading();
        self.surface.set_loading(loading);
    }
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext").field("gateway", &self.gateway).finish()
    }
}
