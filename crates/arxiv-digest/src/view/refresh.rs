//! Full-list refresh with last-request-wins ordering.

use super::ViewContext;
use crate::error::{ViewError, ViewResult};
use crate::models::{ListFilter, PaperRecord};

/// Message shown in place of the list when a fetch fails.
pub const LIST_FAILURE_MESSAGE: &str = "Failed to load papers. Please try again later.";

/// What the paper list region shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListView {
    /// Nothing fetched yet.
    #[default]
    Idle,
    Loaded(Vec<PaperRecord>),
    /// The fetch succeeded with zero papers.
    Empty,
    Failed(String),
}

impl ListView {
    #[must_use]
    pub fn papers(&self) -> &[PaperRecord] {
        match self {
            Self::Loaded(papers) => papers,
            _ => &[],
        }
    }

    #[must_use]
    pub fn paper(&self, paper_id: &str) -> Option<&PaperRecord> {
        self.papers().iter().find(|p| p.id == paper_id)
    }

    pub(crate) fn paper_mut(&mut self, paper_id: &str) -> Option<&mut PaperRecord> {
        match self {
            Self::Loaded(papers) => papers.iter_mut().find(|p| p.id == paper_id),
            _ => None,
        }
    }
}

/// The list region plus its sequence counter.
#[derive(Debug, Default)]
pub struct ListSlot {
    pub view: ListView,
    /// True while the latest issued fetch is outstanding.
    pub loading: bool,
    /// Bumps every time a result is applied.
    pub generation: u64,
    latest: u64,
}

impl ListSlot {
    /// Issue a ticket; any earlier outstanding ticket becomes stale.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.loading = true;
        self.latest
    }

    /// Apply a result if `seq` is the latest ticket.
    pub fn finish(&mut self, seq: u64, result: Result<Vec<PaperRecord>, String>) -> bool {
        if seq != self.latest {
            return false;
        }
        self.view = match result {
            Ok(papers) if papers.is_empty() => ListView::Empty,
            Ok(papers) => ListView::Loaded(papers),
            Err(message) => ListView::Failed(message),
        };
        self.loading = false;
        self.generation += 1;
        true
    }
}

/// What a refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The list now shows this many papers.
    Loaded(usize),
    /// The fetch returned no papers; the empty-state warning is shown.
    Empty,
    /// The fetch failed; the error banner is shown.
    Failed,
    /// A newer refresh was issued before this one completed; its result was dropped.
    Superseded,
}

/// Re-fetches and re-renders the whole list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListRefreshCoordinator;

impl ListRefreshCoordinator {
    /// Change the filter and refresh.
    pub async fn set_filter(&self, ctx: &ViewContext, filter: ListFilter) -> ViewResult<RefreshOutcome> {
        filter.validate()?;
        ctx.state_mut().await.filter = filter;
        self.refresh(ctx).await
    }

    /// Refresh with the current filter.
    pub async fn refresh(&self, ctx: &ViewContext) -> ViewResult<RefreshOutcome> {
        let (seq, filter) = {
            let mut state = ctx.state_mut().await;
            state.filter.validate()?;
            (state.list.begin(), state.filter.clone())
        };
        ctx.sync_loading().await;

        tracing::debug!(seq, category = %filter.category, max_results = filter.max_results, "refreshing papers");
        let result = ctx.gateway.list_papers(&filter).await.map_err(|e| {
            let err = ViewError::from(e);
            tracing::warn!(seq, category = %filter.category, error = %err, "paper list fetch failed");
            LIST_FAILURE_MESSAGE.to_string()
        });

        let outcome = {
            let mut state = ctx.state_mut().await;
            let outcome = match &result {
                Ok(papers) if papers.is_empty() => RefreshOutcome::Empty,
                Ok(papers) => RefreshOutcome::Loaded(papers.len()),
                Err(_) => RefreshOutcome::Failed,
            };
            if !state.list.finish(seq, result) {
                tracing::debug!(seq, "discarding superseded paper list");
                return Ok(RefreshOutcome::Superseded);
            }

            let visible: Vec<String> = state.list.view.papers().iter().map(|p| p.id.clone()).collect();
            state.cards.reset(visible.iter().map(String::as_str));
            outcome
        };

        ctx.render_list().await;
        ctx.sync_loading().await;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str) -> PaperRecord {
        serde_json::from_value(serde_json::json!({ "id": id, "title": id })).unwrap()
    }

    #[test]
    fn test_latest_ticket_wins_in_any_completion_order() {
        let mut slot = ListSlot::default();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.finish(second, Ok(vec![paper("new")])));
        assert!(!slot.finish(first, Ok(vec![paper("old")])));
        assert_eq!(slot.view.papers()[0].id, "new");
        assert!(!slot.loading);
    }

    #[test]
    fn test_stale_completion_keeps_loading() {
        let mut slot = ListSlot::default();
        let first = slot.begin();
        let _second = slot.begin();

        assert!(!slot.finish(first, Ok(vec![paper("old")])));
        assert!(slot.loading);
        assert_eq!(slot.view, ListView::Idle);
    }

    #[test]
    fn test_empty_and_failed_views() {
        let mut slot = ListSlot::default();
        let seq = slot.begin();
        slot.finish(seq, Ok(vec![]));
        assert_eq!(slot.view, ListView::Empty);

        let seq = slot.begin();
        slot.finish(seq, Err(LIST_FAILURE_MESSAGE.to_string()));
        assert_eq!(slot.view, ListView::Failed(LIST_FAILURE_MESSAGE.to_string()));
        assert_eq!(slot.generation, 2);
    }

    #[test]
    fn test_paper_lookup() {
        let mut view = ListView::Loaded(vec![paper("a"), paper("b")]);
        assert!(view.paper("b").is_some());
        assert!(view.paper("c").is_none());
        view.paper_mut("a").unwrap().bookmarked = Some(true);
        assert!(view.paper("a").unwrap().is_bookmarked());
        assert!(ListView::Empty.paper("a").is_none());
    }
}
