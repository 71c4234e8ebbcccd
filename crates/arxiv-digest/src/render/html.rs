//! Escaping and link helpers shared by every template.

use url::Url;

/// Escape HTML special characters. Safe in text and in quoted attributes.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// The URL, escaped for an `href`, if its scheme is `http` or `https`.
#[must_use]
pub fn safe_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| escape(url.as_str()))
}

/// `<a>` opening in a new tab, or nothing when the URL is not web-safe.
pub(crate) fn link(raw: Option<&str>, label: &str, class: &str) -> String {
    raw.and_then(safe_url)
        .map(|href| {
            format!(
                r#"<a class="{class}" href="{href}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                escape(label)
            )
        })
        .unwrap_or_default()
}
