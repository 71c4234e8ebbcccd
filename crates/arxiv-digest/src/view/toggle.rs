//! Per-card summary panel state machine.
//!
//! ```text
//! Collapsed --expand--> Loading --ok--> Expanded --collapse--> Collapsed
//!                          |
//!                          +--err--> Errored --expand--> Loading
//!                                       +-----collapse--> Collapsed
//! ```
//!
//! Every fetch takes a ticket from one counter shared by all cards and is
//! recorded as in flight for its card until it resolves, whatever happens to
//! the card meanwhile. A card never starts a second fetch while one is
//! recorded; a card shown again during an outstanding fetch re-attaches to it.

use std::collections::{HashMap, HashSet};

use super::ViewContext;
use crate::error::ViewError;
use crate::models::SummaryRecord;

/// Summary panel state of one card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CardViewState {
    #[default]
    Collapsed,
    Loading,
    Expanded(SummaryRecord),
    Errored(String),
}

impl CardViewState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Result of asking a card to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandTicket {
    /// Start a fetch under this ticket.
    Fetch(u64),
    /// A fetch from before the card was last hidden is still running; the
    /// card is loading again and waits for it.
    Attached,
    /// Already loading or expanded.
    Busy,
}

/// Card states plus the fetches still in flight.
#[derive(Debug, Default)]
pub struct CardSlots {
    states: HashMap<String, CardViewState>,
    // Survives `reset`; an entry lives exactly as long as its fetch.
    in_flight: HashMap<String, u64>,
    next_ticket: u64,
}

impl CardSlots {
    /// State of a card; unknown cards are collapsed.
    #[must_use]
    pub fn get(&self, paper_id: &str) -> CardViewState {
        self.states.get(paper_id).cloned().unwrap_or_default()
    }

    /// Move to `Loading`, unless already loading or expanded.
    pub fn begin_expand(&mut self, paper_id: &str) -> ExpandTicket {
        if matches!(self.states.get(paper_id), Some(CardViewState::Loading | CardViewState::Expanded(_))) {
            return ExpandTicket::Busy;
        }
        self.states.insert(paper_id.to_string(), CardViewState::Loading);
        if self.in_flight.contains_key(paper_id) {
            return ExpandTicket::Attached;
        }
        self.next_ticket += 1;
        self.in_flight.insert(paper_id.to_string(), self.next_ticket);
        ExpandTicket::Fetch(self.next_ticket)
    }

    /// Collapse an expanded or errored card, discarding its summary.
    ///
    /// A loading card is left alone: its fetch is still the one allowed in flight.
    pub fn collapse(&mut self, paper_id: &str) -> bool {
        match self.states.get(paper_id) {
            Some(CardViewState::Expanded(_) | CardViewState::Errored(_)) => {
                self.states.remove(paper_id);
                true
            }
            _ => false,
        }
    }

    /// Resolve the fetch holding `ticket`. The result is applied only if the
    /// card is loading; otherwise it is dropped.
    pub fn finish(&mut self, paper_id: &str, ticket: u64, result: Result<SummaryRecord, String>) -> bool {
        if self.in_flight.get(paper_id) != Some(&ticket) {
            return false;
        }
        self.in_flight.remove(paper_id);
        if !self.get(paper_id).is_loading() {
            return false;
        }
        let next = match result {
            Ok(summary) => CardViewState::Expanded(summary),
            Err(message) => CardViewState::Errored(message),
        };
        self.states.insert(paper_id.to_string(), next);
        true
    }

    /// Rebuild after a full list render.
    ///
    /// Visible loading cards stay loading so their fetch can land. Every other
    /// card goes back to collapsed; fetches of hidden cards keep running and
    /// their results are dropped unless the card is loading again by then.
    pub fn reset<'a>(&mut self, visible: impl IntoIterator<Item = &'a str>) {
        let visible: HashSet<&str> = visible.into_iter().collect();
        self.states.retain(|id, state| state.is_loading() && visible.contains(id.as_str()));
    }

    /// Number of cards currently loading.
    #[must_use]
    pub fn loading_count(&self) -> usize {
        self.states.values().filter(|s| s.is_loading()).count()
    }

    /// Number of summary fetches not yet resolved, visible or not.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

/// What a toggle request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The summary loaded and the card is expanded.
    Expanded,
    /// The card collapsed.
    Collapsed,
    /// The fetch failed; the card shows the message and a retry button.
    Errored(String),
    /// A fetch for this card is already in flight; nothing was sent.
    AlreadyLoading,
    /// Nothing to do (collapse of a collapsed card, expand of an expanded
    /// one, or a paper that is not listed).
    Unchanged,
    /// The result arrived after the card stopped waiting for it; it was dropped.
    Stale,
}

/// Drives the summary panel of each card.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToggleController;

impl ToggleController {
    /// The card's main button: expand when collapsed or errored, collapse when
    /// expanded, ignore while loading.
    pub async fn toggle(&self, ctx: &ViewContext, paper_id: &str) -> ToggleOutcome {
        let current = ctx.state().await.cards.get(paper_id);
        match current {
            CardViewState::Loading => ToggleOutcome::AlreadyLoading,
            CardViewState::Expanded(_) => self.collapse(ctx, paper_id).await,
            CardViewState::Collapsed | CardViewState::Errored(_) => self.expand(ctx, paper_id).await,
        }
    }

    /// Expand a card, fetching its summary. Cards not in the displayed list
    /// are left alone.
    pub async fn expand(&self, ctx: &ViewContext, paper_id: &str) -> ToggleOutcome {
        let ticket = {
            let mut state = ctx.state_mut().await;
            if state.list.view.paper(paper_id).is_none() {
                tracing::debug!(paper_id, "expand of a paper that is not listed");
                return ToggleOutcome::Unchanged;
            }
            match state.cards.get(paper_id) {
                CardViewState::Loading => return ToggleOutcome::AlreadyLoading,
                CardViewState::Expanded(_) => return ToggleOutcome::Unchanged,
                _ => {}
            }
            state.cards.begin_expand(paper_id)
        };

        let ticket = match ticket {
            ExpandTicket::Fetch(ticket) => ticket,
            ExpandTicket::Attached => {
                tracing::debug!(paper_id, "waiting on the summary fetch already in flight");
                ctx.render_card(paper_id).await;
                return ToggleOutcome::AlreadyLoading;
            }
            ExpandTicket::Busy => return ToggleOutcome::AlreadyLoading,
        };
        ctx.render_card(paper_id).await;

        tracing::debug!(paper_id, ticket, "fetching summary");
        let result = ctx.gateway.paper_summary(paper_id).await.map_err(|e| {
            let err = ViewError::from(e);
            tracing::warn!(paper_id, error = %err, "summary fetch failed");
            summary_failure_message(&err)
        });

        let outcome = match &result {
            Ok(_) => ToggleOutcome::Expanded,
            Err(message) => ToggleOutcome::Errored(message.clone()),
        };

        let applied = ctx.state_mut().await.cards.finish(paper_id, ticket, result);
        if !applied {
            tracing::debug!(paper_id, ticket, "discarding summary for a card that stopped waiting");
            return ToggleOutcome::Stale;
        }

        ctx.render_card(paper_id).await;
        outcome
    }

    /// Collapse a card, discarding its summary.
    pub async fn collapse(&self, ctx: &ViewContext, paper_id: &str) -> ToggleOutcome {
        let changed = ctx.state_mut().await.cards.collapse(paper_id);
        if !changed {
            return ToggleOutcome::Unchanged;
        }
        ctx.render_card(paper_id).await;
        ToggleOutcome::Collapsed
    }
}

fn summary_failure_message(err: &ViewError) -> String {
    match err {
        ViewError::Gateway(crate::error::GatewayError::Unauthenticated) => {
            "Please log in to generate summaries.".to_string()
        }
        _ => "Failed to generate summary. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn summary() -> SummaryRecord {
        SummaryRecord { main_idea: "idea".into(), ..Default::default() }
    }

    fn ticket(slots: &mut CardSlots, id: &str) -> u64 {
        match slots.begin_expand(id) {
            ExpandTicket::Fetch(ticket) => ticket,
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_expand_then_succeed() {
        let mut slots = CardSlots::default();
        let t = ticket(&mut slots, "p1");
        assert_eq!(slots.get("p1"), CardViewState::Loading);
        assert!(slots.finish("p1", t, Ok(summary())));
        assert_eq!(slots.get("p1"), CardViewState::Expanded(summary()));
        assert_eq!(slots.in_flight_count(), 0);
    }

    #[test]
    fn test_second_expand_while_loading_is_refused() {
        let mut slots = CardSlots::default();
        ticket(&mut slots, "p1");
        assert_eq!(slots.begin_expand("p1"), ExpandTicket::Busy);
        assert!(!slots.collapse("p1"));
        assert_eq!(slots.loading_count(), 1);
        assert_eq!(slots.in_flight_count(), 1);
    }

    #[test]
    fn test_errored_can_retry_or_collapse() {
        let mut slots = CardSlots::default();
        let first = ticket(&mut slots, "p1");
        assert!(slots.finish("p1", first, Err("boom".into())));
        assert_eq!(slots.get("p1"), CardViewState::Errored("boom".into()));

        let retry = ticket(&mut slots, "p1");
        assert!(retry > first);
        assert!(slots.finish("p1", retry, Err("again".into())));

        assert!(slots.collapse("p1"));
        assert_eq!(slots.get("p1"), CardViewState::Collapsed);
    }

    #[test]
    fn test_collapse_discards_summary() {
        let mut slots = CardSlots::default();
        let t = ticket(&mut slots, "p1");
        slots.finish("p1", t, Ok(summary()));
        assert!(slots.collapse("p1"));
        assert_eq!(slots.get("p1"), CardViewState::Collapsed);
        assert!(!slots.collapse("p1"));
    }

    #[test]
    fn test_resolved_ticket_is_rejected() {
        let mut slots = CardSlots::default();
        let first = ticket(&mut slots, "p1");
        slots.finish("p1", first, Err("x".into()));
        let second = ticket(&mut slots, "p1");

        assert!(!slots.finish("p1", first, Ok(summary())));
        assert_eq!(slots.get("p1"), CardViewState::Loading);
        assert!(slots.finish("p1", second, Ok(summary())));
    }

    #[test]
    fn test_tickets_are_shared_across_cards() {
        let mut slots = CardSlots::default();
        let a = ticket(&mut slots, "a");
        let b = ticket(&mut slots, "b");
        assert_ne!(a, b);
        assert!(!slots.finish("a", b, Ok(summary())));
        assert!(slots.finish("a", a, Ok(summary())));
    }

    #[test]
    fn test_reset_keeps_visible_loading_cards() {
        let mut slots = CardSlots::default();
        let loading = ticket(&mut slots, "p1");
        let expanded = ticket(&mut slots, "p2");
        slots.finish("p2", expanded, Ok(summary()));
        let gone = ticket(&mut slots, "p3");

        slots.reset(["p1", "p2"]);

        assert_eq!(slots.get("p1"), CardViewState::Loading);
        assert_eq!(slots.get("p2"), CardViewState::Collapsed);
        assert_eq!(slots.get("p3"), CardViewState::Collapsed);

        assert!(slots.finish("p1", loading, Ok(summary())));
        assert!(!slots.finish("p3", gone, Ok(summary())));
        assert_eq!(slots.in_flight_count(), 0);
    }

    #[test]
    fn test_card_shown_again_reattaches_to_running_fetch() {
        let mut slots = CardSlots::default();
        let running = ticket(&mut slots, "p1");

        slots.reset(["p2"]);
        slots.reset(["p1"]);
        assert_eq!(slots.get("p1"), CardViewState::Collapsed);

        assert_eq!(slots.begin_expand("p1"), ExpandTicket::Attached);
        assert_eq!(slots.get("p1"), CardViewState::Loading);
        assert_eq!(slots.in_flight_count(), 1);

        assert!(slots.finish("p1", running, Ok(summary())));
        assert_eq!(slots.get("p1"), CardViewState::Expanded(summary()));
    }

    #[test]
    fn test_hidden_card_result_frees_the_slot() {
        let mut slots = CardSlots::default();
        let running = ticket(&mut slots, "p1");
        slots.reset(["p2"]);

        assert!(!slots.finish("p1", running, Ok(summary())));
        assert_eq!(slots.in_flight_count(), 0);
        assert!(matches!(slots.begin_expand("p1"), ExpandTicket::Fetch(t) if t > running));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Expand,
        Collapse,
        Complete(bool),
        Reset(bool),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Expand),
            Just(Op::Collapse),
            any::<bool>().prop_map(Op::Complete),
            any::<bool>().prop_map(Op::Reset),
        ]
    }

    proptest! {
        /// Whatever the user and the list do, a card never has two fetches
        /// running, and a loading card always has one to wait for.
        #[test]
        fn at_most_one_fetch_per_card(ops in proptest::collection::vec(arb_op(), 1..60)) {
            let mut slots = CardSlots::default();
            let mut running: Option<u64> = None;

            for op in ops {
                match op {
                    Op::Expand => {
                        if let ExpandTicket::Fetch(t) = slots.begin_expand("p") {
                            prop_assert!(running.is_none(), "second fetch started");
                            running = Some(t);
                        }
                    }
                    Op::Collapse => {
                        slots.collapse("p");
                    }
                    Op::Complete(ok) => {
                        if let Some(t) = running.take() {
                            let result = if ok { Ok(summary()) } else { Err("e".to_string()) };
                            slots.finish("p", t, result);
                        }
                    }
                    Op::Reset(visible) => {
                        if visible { slots.reset(["p"]) } else { slots.reset(["q"]) }
                    }
                }

                prop_assert_eq!(slots.in_flight_count(), usize::from(running.is_some()));
                if slots.get("p").is_loading() {
                    prop_assert!(running.is_some());
                }
            }
        }
    }
}
