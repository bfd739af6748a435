//! Rewrite client - turns a raw listing into a generated (title, description).

mod client;
mod prompt;

pub use client::{parse_rewrite_response, ParseFailure, RewriteClient};
pub use prompt::build_rewrite_prompt;

/// Phrase the model is told to write into both fields for non-listings.
///
/// Turkish, like the rest of the generated text.
pub const SPAM_SENTINEL: &str = "İçerik Kalitesi Yetersiz/Spam - Manuel İnceleme Gerekiyor";

/// Substring that identifies a sentinel-carrying response.
pub const SPAM_MARKER: &str = "Manuel İnceleme Gerekiyor";

/// Every marker accepted as a manual-review flag. Models sometimes answer
/// the spam instruction in English.
const SPAM_MARKERS: &[&str] = &[SPAM_MARKER, "Needs Manual Review"];

/// Outcome of one rewrite request, after retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { title: String, description: String },
    MalformedResponse,
    TransientFailure,
}

/// Whether generated text carries the manual-review marker.
pub fn contains_spam_marker(text: &str) -> bool {
    SPAM_MARKERS.iter().any(|marker| text.contains(marker))
}
