//! Field extraction - best-effort recovery of structured fields from
//! listing text.
//!
//! Each field is an ordered chain of [`ExtractionRule`]s. The first rule that
//! yields a value wins; values from different rules are never merged.

mod company;
mod employment;
mod salary;

use lazy_static::lazy_static;
use tracing::debug;

pub use company::{company_rules, CapitalizedRunRule, CaptureRule};
pub use employment::normalize_employment_type;
pub use salary::{salary_rules, AmountRule, RateRule};

use crate::domains::listings::models::{COMPANY_PLACEHOLDER, SALARY_UNKNOWN};

/// One way of pulling a field value out of free text.
pub trait ExtractionRule: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn try_extract(&self, text: &str) -> Option<String>;
}

/// Ordered rules plus the value returned when none match.
pub struct RuleChain {
    field: &'static str,
    rules: Vec<Box<dyn ExtractionRule>>,
    default: String,
}

impl RuleChain {
    pub fn new(field: &'static str, default: impl Into<String>) -> Self {
        Self {
            field,
            rules: Vec::new(),
            default: default.into(),
        }
    }

    /// Append a rule at the lowest priority.
    pub fn with_rule(mut self, rule: impl ExtractionRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn extract(&self, text: &str) -> String {
        for rule in &self.rules {
            if let Some(value) = rule.try_extract(text) {
                debug!(field = self.field, rule = rule.name(), value = %value, "Field extracted");
                return value;
            }
        }
        self.default.clone()
    }
}

lazy_static! {
    static ref COMPANY_RULES: RuleChain = company_rules();
    static ref SALARY_RULES: RuleChain = salary_rules();
}

/// Best guess at the employer name, or [`COMPANY_PLACEHOLDER`].
pub fn extract_company(description: &str) -> String {
    COMPANY_RULES.extract(description)
}

/// Salary as written in the text with a `₺` suffix, an hourly or per-package
/// rate, or [`SALARY_UNKNOWN`].
pub fn extract_salary(description: &str) -> String {
    SALARY_RULES.extract(description)
}

pub(crate) fn char_len_within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}
