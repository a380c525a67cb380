// Decides what a scanned payload is: a link to open, or text to show.

use regex::Regex;
use std::sync::OnceLock;

// scheme, non-empty host (optionally with port), then anything without spaces
const URL_PATTERN: &str = r"(?i)^https?://[^\s/?#]+(?:[/?#]\S*)?$";

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL_PATTERN is a valid regex"))
}

/// True when the payload starts with an http or https scheme.
///
/// History rows use this to decide whether they are tappable.
pub fn is_link(payload: &str) -> bool {
    let lower = payload.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// True when the payload is a complete http(s) URL
pub fn is_well_formed_url(payload: &str) -> bool {
    url_regex().is_match(payload.trim())
}

/// What the live scan flow does with a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadAction {
    OpenUrl(String),
    ShowText(String),
}

impl PayloadAction {
    pub fn classify(payload: &str) -> Self {
        if is_well_formed_url(payload) {
            PayloadAction::OpenUrl(payload.trim().to_string())
        } else {
            PayloadAction::ShowText(payload.to_string())
        }
    }
}
