//! User-supplied inputs, validated before they reach the gateway.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::api;
use crate::error::{ViewError, ViewResult};

/// Listing filter: category and page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    /// arXiv category, e.g. `cs.AI`.
    #[serde(default = "default_category")]
    pub category: String,

    /// Page size.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_category() -> String {
    api::DEFAULT_CATEGORY.to_string()
}

fn default_max_results() -> u32 {
    api::DEFAULT_MAX_RESULTS
}

impl ListFilter {
    #[must_use]
    pub fn new(category: impl Into<String>, max_results: u32) -> Self {
        Self { category: category.into(), max_results }
    }

    /// Reject filters the backend would silently rewrite.
    pub fn validate(&self) -> ViewResult<()> {
        if self.category.trim().is_empty() {
            return Err(ViewError::validation("category", "Please choose a category"));
        }
        if !(1..=api::MAX_RESULTS_CAP).contains(&self.max_results) {
            return Err(ViewError::validation(
                "max_results",
                format!("Number of results must be between 1 and {}", api::MAX_RESULTS_CAP),
            ));
        }
        Ok(())
    }

    /// Query parameters for the listing endpoint.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("category", self.category.trim().to_string()),
            ("max_results", self.max_results.to_string()),
        ]
    }
}

impl Default for ListFilter {
    fn default() -> Self {
        Self::new(default_category(), default_max_results())
    }
}

static DISCOUNT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("valid discount code regex"));

/// A discount code that passed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountCode(String);

impl DiscountCode {
    /// Trim and validate raw input from the discount field.
    pub fn parse(input: &str) -> ViewResult<Self> {
        let code = input.trim();
        if code.is_empty() {
            return Err(ViewError::validation("code", "Please enter a discount code"));
        }
        if !DISCOUNT_CODE.is_match(code) {
            return Err(ViewError::validation(
                "code",
                "Discount codes contain only letters, digits, '-' and '_' (at most 32)",
            ));
        }
        Ok(Self(code.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
