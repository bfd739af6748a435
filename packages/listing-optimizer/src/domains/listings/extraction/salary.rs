use lazy_static::lazy_static;
use regex::Regex;

use super::{ExtractionRule, RuleChain};
use crate::domains::listings::models::SALARY_UNKNOWN;

/// Plausible monthly salary range in lira.
const MIN_MONTHLY: u64 = 5_000;
const MAX_MONTHLY: u64 = 500_000;

lazy_static! {
    // "Maaş: 45.000 TL", "ücret 30000₺"
    static ref LABELED_AMOUNT_REGEX: Regex = Regex::new(
        r"(?i)\b(?:maaş|ücret|gelir|salary|wage|income)[^\d\n]{0,20}?\b(\d{1,3}(?:\.\d{3})+|\d+)\s*(?:TL|₺|lira)"
    ).unwrap();

    // "45.000 TL", "30000₺"
    static ref BARE_AMOUNT_REGEX: Regex = Regex::new(
        r"(?i)\b(\d{1,3}(?:\.\d{3})+|\d+)\s*(?:TL|₺)"
    ).unwrap();

    // "Aylık net 40.000", "brüt: 55000"
    static ref PERIOD_AMOUNT_REGEX: Regex = Regex::new(
        r"(?i)\b(?:aylık|brüt|net|monthly|gross)\b[^\d\n]{0,20}?\b(\d{1,3}(?:\.\d{3})+|\d+)"
    ).unwrap();

    static ref HOURLY_LABEL_REGEX: Regex = Regex::new(
        r"(?i)\b(?:saatlik|saat başı|saat başına|hourly|per hour)[^\d\n]{0,15}?\b(\d{1,3}(?:\.\d{3})+|\d+)"
    ).unwrap();

    static ref HOURLY_RATE_REGEX: Regex = Regex::new(
        r"(?i)\b(\d{1,3}(?:\.\d{3})+|\d+)\s*(?:TL|₺|lira)?\s*/\s*(?:saat|hour|hr)\b"
    ).unwrap();

    static ref PACKAGE_LABEL_REGEX: Regex = Regex::new(
        r"(?i)\b(?:paket başı|paket başına|per package|per-package)[^\d\n]{0,15}?\b(\d{1,3}(?:\.\d{3})+|\d+)"
    ).unwrap();

    static ref PACKAGE_RATE_REGEX: Regex = Regex::new(
        r"(?i)\b(\d{1,3}(?:\.\d{3})+|\d+)\s*(?:TL|₺|lira)?\s*/\s*paket\b"
    ).unwrap();
}

/// Drop thousands separators and parse.
fn parse_amount(written: &str) -> Option<u64> {
    written.replace('.', "").parse().ok()
}

/// Monthly amount, returned as written with a `₺` suffix when in range.
pub struct AmountRule {
    name: &'static str,
    regex: &'static Regex,
    min: u64,
    max: u64,
}

impl AmountRule {
    pub fn new(name: &'static str, regex: &'static Regex) -> Self {
        Self {
            name,
            regex,
            min: MIN_MONTHLY,
            max: MAX_MONTHLY,
        }
    }

    pub fn with_range(mut self, min: u64, max: u64) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl ExtractionRule for AmountRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn try_extract(&self, text: &str) -> Option<String> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find(|m| {
                parse_amount(m.as_str()).is_some_and(|value| (self.min..=self.max).contains(&value))
            })
            .map(|m| format!("{}₺", m.as_str()))
    }
}

/// Hourly or per-package rate, e.g. `Hourly 150₺`.
pub struct RateRule {
    name: &'static str,
    label: &'static str,
    regexes: Vec<&'static Regex>,
}

impl RateRule {
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            regexes: Vec::new(),
        }
    }

    pub fn with_pattern(mut self, regex: &'static Regex) -> Self {
        self.regexes.push(regex);
        self
    }
}

impl ExtractionRule for RateRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn try_extract(&self, text: &str) -> Option<String> {
        self.regexes.iter().find_map(|regex| {
            regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .filter_map(|m| parse_amount(m.as_str()))
                .find(|rate| *rate > 0)
                .map(|rate| format!("{} {}₺", self.label, rate))
        })
    }
}

/// Default salary rules in priority order.
pub fn salary_rules() -> RuleChain {
    RuleChain::new("salary", SALARY_UNKNOWN)
        .with_rule(AmountRule::new("labeled_amount", &LABELED_AMOUNT_REGEX))
        .with_rule(AmountRule::new("bare_amount", &BARE_AMOUNT_REGEX))
        .with_rule(AmountRule::new("period_amount", &PERIOD_AMOUNT_REGEX))
        .with_rule(
            RateRule::new("hourly_rate", "Hourly")
                .with_pattern(&HOURLY_LABEL_REGEX)
                .with_pattern(&HOURLY_RATE_REGEX),
        )
        .with_rule(
            RateRule::new("package_rate", "Per-package")
                .with_pattern(&PACKAGE_LABEL_REGEX)
                .with_pattern(&PACKAGE_RATE_REGEX),
        )
}
