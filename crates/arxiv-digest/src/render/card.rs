//! One paper card and its summary panel.

use super::html::{escape, link};
use crate::models::{PaperRecord, SummaryRecord};
use crate::view::CardViewState;

/// Characters of the main idea shown on a collapsed card with an embedded summary.
const PREVIEW_CHARS: usize = 150;

/// Render a paper card in the given summary state.
///
/// Pure: the same record and state always produce the same markup.
#[must_use]
pub fn render_card(paper: &PaperRecord, state: &CardViewState) -> String {
    let id = escape(&paper.id);
    let published = paper
        .published_date()
        .map(|date| format!(r#"<p class="paper-published">Published: {}</p>"#, escape(&date)))
        .unwrap_or_default();
    let authors = if paper.authors.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="paper-authors">{}</p>"#, escape(&paper.author_line()))
    };
    let links = [
        link(paper.url.as_deref(), "View on arXiv", "paper-link"),
        link(paper.pdf_url.as_deref(), "PDF", "pdf-link"),
    ]
    .into_iter()
    .filter(|l| !l.is_empty())
    .collect::<Vec<_>>()
    .join(" ");
    let preview = match (state, &paper.summary) {
        (CardViewState::Collapsed, Some(summary)) if !summary.main_idea.trim().is_empty() => format!(
            r#"<p class="summary-preview"><strong>Main Idea:</strong> {}</p>"#,
            escape(&truncate(&summary.main_idea, PREVIEW_CHARS))
        ),
        _ => String::new(),
    };

    format!(
        r#"<article class="paper-card" id="paper-{id}" data-paper-id="{id}">
<h3 class="paper-title">{title}</h3>
{authors}{published}<p class="paper-abstract">{abstract_text}</p>
<div class="paper-links">{links}</div>
{preview}<div class="paper-actions">{summary_button} {bookmark_button}</div>
{panel}
</article>"#,
        title = escape(&paper.title),
        abstract_text = escape(&paper.r#abstract),
        summary_button = summary_button(&id, state),
        bookmark_button = bookmark_button(&id, paper.is_bookmarked()),
        panel = summary_panel(&id, state),
    )
}

fn summary_button(id: &str, state: &CardViewState) -> String {
    let (label, disabled) = match state {
        CardViewState::Collapsed | CardViewState::Errored(_) => ("Generate Summary", ""),
        CardViewState::Loading => ("Hide Summary", " disabled"),
        CardViewState::Expanded(_) => ("Hide Summary", ""),
    };
    format!(
        r#"<button class="btn btn-summary" data-action="toggle-summary" data-paper-id="{id}"{disabled}>{label}</button>"#
    )
}

fn bookmark_button(id: &str, bookmarked: bool) -> String {
    let label = if bookmarked { "Bookmarked" } else { "Bookmark" };
    format!(
        r#"<button class="btn btn-bookmark" data-action="toggle-bookmark" data-paper-id="{id}" aria-pressed="{bookmarked}">{label}</button>"#
    )
}

fn summary_panel(id: &str, state: &CardViewState) -> String {
    match state {
        CardViewState::Collapsed => {
            format!(r#"<div class="summary-panel" id="summary-{id}" hidden></div>"#)
        }
        CardViewState::Loading => format!(
            r#"<div class="summary-panel loading" id="summary-{id}"><div class="skeleton"></div><div class="skeleton"></div><div class="skeleton"></div></div>"#
        ),
        CardViewState::Expanded(summary) => {
            format!(r#"<div class="summary-panel" id="summary-{id}">{}</div>"#, summary_sections(summary))
        }
        CardViewState::Errored(message) => format!(
            r#"<div class="summary-panel error" id="summary-{id}"><p class="summary-error">{}</p><button class="btn btn-retry" data-action="toggle-summary" data-paper-id="{id}">Retry</button><button class="btn btn-hide" data-action="collapse-summary" data-paper-id="{id}">Hide</button></div>"#,
            escape(message)
        ),
    }
}

fn summary_sections(summary: &SummaryRecord) -> String {
    [
        ("Observation", &summary.observation),
        ("Objective", &summary.objective),
        ("Challenge", &summary.challenge),
        ("Main Idea", &summary.main_idea),
    ]
    .iter()
    .map(|(heading, body)| {
        format!(r#"<section class="summary-section"><h4>{heading}</h4><p>{}</p></section>"#, escape(body))
    })
    .collect()
}

/// Cut to `max` characters, appending an ellipsis when something was cut.
fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper() -> PaperRecord {
        serde_json::from_value(serde_json::json!({
            "id": "2401.00001",
            "title": "Attention <Is> All You Need",
            "authors": ["A. Vaswani", "N. Shazeer"],
            "published": "2024-01-01T00:00:00Z",
            "abstract": "We propose a \"Transformer\" & more.",
            "url": "https://arxiv.org/abs/2401.00001",
            "pdf_url": "javascript:alert(1)",
        }))
        .unwrap()
    }

    fn summary() -> SummaryRecord {
        SummaryRecord {
            observation: "obs".into(),
            objective: "obj".into(),
            challenge: "chal".into(),
            main_idea: "idea".into(),
        }
    }

    #[test]
    fn test_collapsed_card() {
        let html = render_card(&paper(), &CardViewState::Collapsed);
        assert!(html.contains("Attention &lt;Is&gt; All You Need"));
        assert!(html.contains("&quot;Transformer&quot; &amp; more."));
        assert!(html.contains("A. Vaswani, N. Shazeer"));
        assert!(html.contains("Published: 2024-01-01"));
        assert!(html.contains("Generate Summary"));
        assert!(html.contains(r#"data-action="toggle-summary" data-paper-id="2401.00001""#));
        assert!(html.contains(" hidden></div>"));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn test_unsafe_link_is_dropped() {
        let html = render_card(&paper(), &CardViewState::Collapsed);
        assert!(html.contains(r#"href="https://arxiv.org/abs/2401.00001""#));
        assert!(!html.contains("javascript:"));
        assert!(!html.contains(">PDF<"));
    }

    #[test]
    fn test_loading_card() {
        let html = render_card(&paper(), &CardViewState::Loading);
        assert!(html.contains("Hide Summary"));
        assert!(html.contains(" disabled>"));
        assert!(html.contains(r#"class="skeleton""#));
    }

    #[test]
    fn test_expanded_card_shows_four_sections() {
        let html = render_card(&paper(), &CardViewState::Expanded(summary()));
        for heading in ["Observation", "Objective", "Challenge", "Main Idea"] {
            assert!(html.contains(&format!("<h4>{heading}</h4>")), "missing {heading}");
        }
        assert!(html.contains("<p>idea</p>"));
        assert!(!html.contains(" disabled>"));
    }

    #[test]
    fn test_errored_card_offers_retry() {
        let html = render_card(&paper(), &CardViewState::Errored("Failed <now>".into()));
        assert!(html.contains("Failed &lt;now&gt;"));
        assert!(html.contains(">Retry</button>"));
        assert!(html.contains("Generate Summary"));
    }

    #[test]
    fn test_errored_card_can_be_hidden() {
        let html = render_card(&paper(), &CardViewState::Errored("Failed".into()));
        assert!(html.contains(r#"data-action="collapse-summary" data-paper-id="2401.00001">Hide</button>"#));
        let html = render_card(&paper(), &CardViewState::Collapsed);
        assert!(!html.contains("collapse-summary"));
    }

    #[test]
    fn test_bookmark_button_reflects_flag() {
        let html = render_card(&paper().with_bookmark(true), &CardViewState::Collapsed);
        assert!(html.contains(r#"aria-pressed="true">Bookmarked<"#));
        let html = render_card(&paper(), &CardViewState::Collapsed);
        assert!(html.contains(r#"aria-pressed="false">Bookmark<"#));
    }

    #[test]
    fn test_embedded_summary_preview() {
        let mut p = paper();
        p.summary = Some(SummaryRecord { main_idea: "x".repeat(200), ..summary() });
        let html = render_card(&p, &CardViewState::Collapsed);
        assert!(html.contains(&format!("{}...", "x".repeat(150))));

        let html = render_card(&p, &CardViewState::Expanded(summary()));
        assert!(!html.contains("summary-preview"));
    }

    #[test]
    fn test_id_is_escaped_in_attributes() {
        let mut p = paper();
        p.id = r#"1"><script>"#.into();
        let html = render_card(&p, &CardViewState::Collapsed);
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"data-paper-id="1&quot;&gt;&lt;script&gt;""#));
    }

    #[test]
    fn test_deterministic() {
        let state = CardViewState::Expanded(summary());
        assert_eq!(render_card(&paper(), &state), render_card(&paper(), &state));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
