//! List, notices, filter controls and the page shell.

use super::card::render_card;
use super::html::escape;
use super::subscription::render_subscription;
use crate::models::ListFilter;
use crate::view::{CardSlots, ListView, Notice, NoticeKind, ViewState};

/// Shown in place of the list when the backend returns zero papers.
pub const EMPTY_STATE_MESSAGE: &str = "No papers found for this category. Try another category or try again later.";

/// Categories offered in the filter control.
pub const CATEGORIES: [(&str, &str); 4] = [
    ("cs.CV", "Computer Vision"),
    ("cs.AI", "Artificial Intelligence"),
    ("cs.LG", "Machine Learning"),
    ("cs.CL", "Computation and Language"),
];

/// Page sizes offered in the filter control.
pub const PAGE_SIZES: [u32; 4] = [5, 10, 20, 50];

/// Render the paper list region.
#[must_use]
pub fn render_list(view: &ListView, cards: &CardSlots) -> String {
    match view {
        ListView::Idle => String::new(),
        ListView::Loaded(papers) => papers
            .iter()
            .map(|p| render_card(p, &cards.get(&p.id)))
            .collect::<Vec<_>>()
            .join("\n"),
        ListView::Empty => render_empty_state(),
        ListView::Failed(message) => render_error_banner(message),
    }
}

/// Warning shown when a fetch succeeds with no papers.
#[must_use]
pub fn render_empty_state() -> String {
    format!(r#"<div class="empty-state"><p class="text-warning">{}</p></div>"#, escape(EMPTY_STATE_MESSAGE))
}

/// Error banner shown when the list fails to load.
#[must_use]
pub fn render_error_banner(message: &str) -> String {
    format!(r#"<div class="alert alert-error" role="alert">{}</div>"#, escape(message))
}

/// Notice region; empty when there is no notice.
#[must_use]
pub fn render_notice(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let class = match notice.kind {
        NoticeKind::Error => "alert-error",
        NoticeKind::Warning => "alert-warning",
        NoticeKind::Success => "alert-success",
    };
    format!(r#"<div class="alert {class}" role="status">{}</div>"#, escape(&notice.message))
}

/// Global loading indicator.
#[must_use]
pub fn render_loading(visible: bool) -> String {
    let hidden = if visible { "" } else { " hidden" };
    format!(r#"<div id="loadingSpinner" class="spinner{hidden}" aria-busy="{visible}"></div>"#)
}

/// Category and page-size selectors plus the refresh button.
#[must_use]
pub fn render_filters(filter: &ListFilter) -> String {
    let categories: String = CATEGORIES
        .iter()
        .map(|(value, label)| {
            let selected = if *value == filter.category { " selected" } else { "" };
            format!(r#"<option value="{value}"{selected}>{}</option>"#, escape(label))
        })
        .collect();
    let sizes: String = PAGE_SIZES
        .iter()
        .map(|n| {
            let selected = if *n == filter.max_results { " selected" } else { "" };
            format!(r#"<option value="{n}"{selected}>{n}</option>"#)
        })
        .collect();

    format!(
        r#"<form class="filters" data-action="filter">
<select name="category">{categories}</select>
<select name="max_results">{sizes}</select>
<button type="button" class="btn" data-action="refresh">Refresh</button>
</form>"#
    )
}

/// The whole page from a state snapshot.
#[must_use]
pub fn render_page(state: &ViewState) -> String {
    format!(
        r#"<main class="digest">
{filters}
{spinner}
<div id="notices">{notices}</div>
<div id="papers">{papers}</div>
<aside id="subscription">{subscription}</aside>
</main>"#,
        filters = render_filters(&state.filter),
        spinner = render_loading(state.loading()),
        notices = render_notice(state.notice.as_ref()),
        papers = render_list(&state.list.view, &state.cards),
        subscription = render_subscription(&state.subscription),
    )
}
