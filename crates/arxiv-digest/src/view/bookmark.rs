//! Optimistic bookmark toggling.

use super::ViewContext;
use crate::error::{GatewayError, ViewError, ViewResult};

/// What a bookmark click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkOutcome {
    /// The backend accepted the toggle; the card shows the new flag.
    Toggled { bookmarked: bool },
    /// A toggle for this paper is still in flight; nothing was sent.
    InFlight,
    /// The paper is not in the displayed list; nothing was sent.
    NotListed,
}

/// Toggles bookmarks, flipping the card before the backend answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookmarkController;

impl BookmarkController {
    /// Toggle the bookmark on a paper.
    ///
    /// Without a credential the login prompt is shown and no request is made.
    /// On failure the optimistic flip is reverted, provided the same list is
    /// still displayed.
    pub async fn toggle(&self, ctx: &ViewContext, paper_id: &str) -> ViewResult<BookmarkOutcome> {
        if !ctx.gateway.credentials().is_present().await {
            return Err(Self::unauthenticated(ctx));
        }

        let (generation, bookmarked) = {
            let mut state = ctx.state_mut().await;
            if state.bookmarks_in_flight.contains(paper_id) {
                return Ok(BookmarkOutcome::InFlight);
            }
            let generation = state.list.generation;
            let Some(paper) = state.list.view.paper_mut(paper_id) else {
                tracing::debug!(paper_id, "bookmark of a paper that is not listed");
                return Ok(BookmarkOutcome::NotListed);
            };
            let bookmarked = !paper.is_bookmarked();
            paper.bookmarked = Some(bookmarked);
            state.bookmarks_in_flight.insert(paper_id.to_string());
            (generation, bookmarked)
        };
        ctx.render_card(paper_id).await;

        let result = ctx.gateway.toggle_bookmark(paper_id).await;

        {
            let mut state = ctx.state_mut().await;
            state.bookmarks_in_flight.remove(paper_id);
            if result.is_err() && state.list.generation == generation {
                if let Some(paper) = state.list.view.paper_mut(paper_id) {
                    paper.bookmarked = Some(!bookmarked);
                }
            }
        }

        match result {
            Ok(()) => {
                tracing::debug!(paper_id, bookmarked, "bookmark toggled");
                Ok(BookmarkOutcome::Toggled { bookmarked })
            }
            Err(err) => {
                tracing::warn!(paper_id, error = %err, "bookmark toggle failed");
                ctx.render_card(paper_id).await;
                Err(err.into())
            }
        }
    }

    fn unauthenticated(ctx: &ViewContext) -> ViewError {
        tracing::debug!("bookmark requires login");
        ctx.gateway.prompt_login();
        GatewayError::Unauthenticated.into()
    }
}
