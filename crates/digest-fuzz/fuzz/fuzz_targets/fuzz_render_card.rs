#![no_main]

use arxiv_digest::models::{PaperRecord, SummaryRecord};
use arxiv_digest::render::render_card;
use arxiv_digest::view::CardViewState;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(paper) = serde_json::from_slice::<PaperRecord>(data) else {
        return;
    };

    let summary = paper.summary.clone().unwrap_or_else(|| SummaryRecord {
        main_idea: paper.title.clone(),
        ..Default::default()
    });
    let states = [
        CardViewState::Collapsed,
        CardViewState::Loading,
        CardViewState::Expanded(summary),
        CardViewState::Errored(paper.r#abstract.clone()),
    ];

    for state in &states {
        let html = render_card(&paper, state);
        // Text fields are escaped, so they can never open a script tag
        assert!(!html.contains("<script"));
    }
});
