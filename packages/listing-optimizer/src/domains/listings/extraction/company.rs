use lazy_static::lazy_static;
use regex::Regex;

use super::{char_len_within, ExtractionRule, RuleChain};
use crate::domains::listings::models::COMPANY_PLACEHOLDER;

const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 50;

/// Characters scanned by the fallback when the text has no sentence end.
const FALLBACK_WINDOW: usize = 100;

lazy_static! {
    // "Firma: Yıldız Gıda A.Ş." - name runs to a sentence stop or clause break
    static ref COMPANY_LABEL_REGEX: Regex = Regex::new(
        r"\b(?:[Şş]irket|[Ff]irma|[İi]şveren|[Cc]ompany|[Ff]irm)\s*:\s*(\p{L}[^\n,;:!?()]*?)\s*(?:\.(?:\s|$)|[\n,;:!?()]|$)"
    ).unwrap();

    // "Anadolu Kurye", "Deniz Lojistik" - capitalized words before a trade suffix
    static ref COMPANY_SUFFIX_REGEX: Regex = Regex::new(
        r"((?:\p{Lu}[\p{L}\p{N}&'.-]*\s+){1,4}(?:Şirketi|Firması|Kurye|Kargo|Lojistik|Company|Courier|Logistics))\b"
    ).unwrap();

    // "Başvuru: Kartal Market" - phone numbers are skipped by the capital
    static ref CONTACT_LABEL_REGEX: Regex = Regex::new(
        r"\b(?:[İi]letişim|[Bb]aşvuru|[Cc]ontact|[Aa]pply)\s*:\s*(\p{Lu}[^\n,;:!?()]*?)\s*(?:\.(?:\s|$)|[\n,;:!?()]|$)"
    ).unwrap();
}

/// Returns the first capture group, trimmed, whose length is in range.
pub struct CaptureRule {
    name: &'static str,
    regex: &'static Regex,
}

impl CaptureRule {
    /// `regex` must contain exactly one capture group.
    pub fn new(name: &'static str, regex: &'static Regex) -> Self {
        Self { name, regex }
    }
}

impl ExtractionRule for CaptureRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn try_extract(&self, text: &str) -> Option<String> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().trim_end_matches('.').trim().to_string())
            .find(|name| char_len_within(name, MIN_NAME_LEN, MAX_NAME_LEN))
    }
}

/// Longest run of capitalized words in the opening sentence.
pub struct CapitalizedRunRule;

impl ExtractionRule for CapitalizedRunRule {
    fn name(&self) -> &'static str {
        "capitalized_run"
    }

    fn try_extract(&self, text: &str) -> Option<String> {
        let mut best: Option<String> = None;
        let mut run: Vec<&str> = Vec::new();

        for word in opening_sentence(text).split_whitespace() {
            let cleaned = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '&');
            let capitalized = cleaned.chars().next().is_some_and(char::is_uppercase);

            if capitalized {
                run.push(cleaned);
                if word.ends_with(&[',', ';', ':'][..]) {
                    keep_longest(&mut best, &mut run);
                }
            } else {
                keep_longest(&mut best, &mut run);
            }
        }
        keep_longest(&mut best, &mut run);

        best
    }
}

fn opening_sentence(text: &str) -> &str {
    match text.find(&['.', '!', '?'][..]) {
        Some(end) => &text[..end],
        None => match text.char_indices().nth(FALLBACK_WINDOW) {
            Some((cut, _)) => &text[..cut],
            None => text,
        },
    }
}

fn keep_longest(best: &mut Option<String>, run: &mut Vec<&str>) {
    if run.is_empty() {
        return;
    }

    let candidate = run.join(" ");
    run.clear();

    let len = candidate.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return;
    }
    if best.as_ref().map_or(true, |b| len > b.chars().count()) {
        *best = Some(candidate);
    }
}

/// Default company rules in priority order.
pub fn company_rules() -> RuleChain {
    RuleChain::new("company", COMPANY_PLACEHOLDER)
        .with_rule(CaptureRule::new("company_label", &COMPANY_LABEL_REGEX))
        .with_rule(CaptureRule::new("company_suffix", &COMPANY_SUFFIX_REGEX))
        .with_rule(CaptureRule::new("contact_label", &CONTACT_LABEL_REGEX))
        .with_rule(CapitalizedRunRule)
}
