//! Fuzzing library for arxiv-digest.
//!
//! Targets cover decoding of backend payloads and rendering of whatever
//! decodes successfully.
//!
//! # Usage
//!
//! ```bash
//! cd crates/digest-fuzz
//! cargo +nightly fuzz run fuzz_render_card -- -max_total_time=60
//! ```

pub use arxiv_digest::{models, render};
