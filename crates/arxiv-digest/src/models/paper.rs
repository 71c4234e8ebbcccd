//! Paper and summary records as served by the digest backend.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A paper in the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPaper")]
pub struct PaperRecord {
    /// Identifier used in summary and bookmark paths.
    pub id: String,

    /// Paper title.
    pub title: String,

    /// Author names in byline order.
    pub authors: Vec<String>,

    /// Publication timestamp as sent by the backend.
    pub published: Option<String>,

    /// Abstract text.
    pub r#abstract: String,

    /// Landing page (arXiv abstract page).
    pub url: Option<String>,

    /// Direct PDF link.
    pub pdf_url: Option<String>,

    /// Whether the current user bookmarked this paper, when the backend knows.
    pub bookmarked: Option<bool>,

    /// Summary embedded by the dashboard endpoint.
    pub summary: Option<SummaryRecord>,
}

impl PaperRecord {
    /// Author names as a comma-separated byline.
    #[must_use]
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// Publication date as `YYYY-MM-DD`, or the raw value when it doesn't parse.
    #[must_use]
    pub fn published_date(&self) -> Option<String> {
        let raw = self.published.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive().to_string());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date().to_string());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.to_string());
        }
        Some(raw.to_string())
    }

    /// True when the backend marked this paper as bookmarked.
    #[must_use]
    pub fn is_bookmarked(&self) -> bool {
        self.bookmarked.unwrap_or(false)
    }

    /// Copy of this record with the bookmark flag set.
    #[must_use]
    pub fn with_bookmark(&self, bookmarked: bool) -> Self {
        Self { bookmarked: Some(bookmarked), ..self.clone() }
    }
}

/// AI-generated summary, four free-text sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Key problem or issue identified.
    #[serde(default)]
    pub observation: String,

    /// Research goal or intended solution.
    #[serde(default)]
    pub objective: String,

    /// Main technical or conceptual difficulty.
    #[serde(default)]
    pub challenge: String,

    /// The proposed approach.
    #[serde(default)]
    pub main_idea: String,
}

/// Envelope returned by the summary endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    /// The generated summary.
    pub summary: SummaryRecord,
}

/// Wire shape accepted from both the public and the dashboard listing.
#[derive(Deserialize)]
struct RawPaper {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Option<RawAuthors>,
    #[serde(default, alias = "published_date")]
    published: Option<String>,
    #[serde(default)]
    r#abstract: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    pdf_url: Option<String>,
    #[serde(default)]
    bookmarked: Option<bool>,
    #[serde(default)]
    summary: Option<SummaryRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAuthors {
    List(Vec<String>),
    Joined(String),
}

impl TryFrom<RawPaper> for PaperRecord {
    type Error = String;

    fn try_from(raw: RawPaper) -> Result<Self, Self::Error> {
        let id = match raw.id {
            Some(RawId::Text(id)) if !id.trim().is_empty() => id,
            Some(RawId::Number(n)) => n.to_string(),
            _ => raw
                .url
                .as_deref()
                .and_then(id_from_url)
                .ok_or_else(|| "paper has neither an id nor a usable url".to_string())?,
        };

        let authors = match raw.authors {
            Some(RawAuthors::List(names)) => names,
            Some(RawAuthors::Joined(line)) => line
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            id,
            title: raw.title.unwrap_or_default(),
            authors,
            published: raw.published,
            r#abstract: raw.r#abstract.unwrap_or_default(),
            url: raw.url,
            pdf_url: raw.pdf_url,
            bookmarked: raw.bookmarked,
            summary: raw.summary,
        })
    }
}

/// Last non-empty path segment, e.g. `http://arxiv.org/abs/2401.01234v1` -> `2401.01234v1`.
fn id_from_url(url: &str) -> Option<String> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .map(String::from)
}
