#![no_main]

use arxiv_digest::models::PaperRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Listing payloads: must return Ok or Err, never panic
    if let Ok(papers) = serde_json::from_slice::<Vec<PaperRecord>>(data) {
        for paper in &papers {
            let _ = paper.published_date();
            let _ = paper.author_line();
        }
    }
});
