//! Job id generation.
//!
//! Ids look like `-<last 8 digits of createdAt><12 hex>` or `-<20 hex>` when
//! no timestamp is known.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::PipelineError;

const TIMESTAMP_DIGITS: usize = 8;
const SEEDED_HEX_LEN: usize = 12;
const UNSEEDED_HEX_LEN: usize = 20;

/// Candidates tried before giving up on a colliding id.
const DEFAULT_MAX_ATTEMPTS: u32 = 16;

/// Issues job ids, optionally refusing any id it has already seen.
#[derive(Debug, Clone)]
pub struct IdentifierGenerator {
    issued: HashSet<String>,
    track_issued: bool,
    max_attempts: u32,
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierGenerator {
    /// Generator that checks every id against those already issued.
    pub fn new() -> Self {
        Self {
            issued: HashSet::new(),
            track_issued: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Generator that trusts randomness alone.
    pub fn untracked() -> Self {
        Self {
            issued: HashSet::new(),
            track_issued: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Candidates tried per id when tracking is on.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn is_tracking(&self) -> bool {
        self.track_issued
    }

    /// Mark existing ids as taken.
    pub fn register<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.track_issued {
            self.issued.extend(ids.into_iter().map(Into::into));
        }
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    pub fn generate(&mut self, created_at: Option<i64>) -> Result<String, PipelineError> {
        if !self.track_issued {
            return Ok(candidate_id(created_at));
        }

        for _ in 0..self.max_attempts {
            let id = candidate_id(created_at);
            if self.issued.insert(id.clone()) {
                return Ok(id);
            }
            tracing::debug!(id = %id, "Generated job id collides, regenerating");
        }

        Err(PipelineError::IdentifierExhausted {
            attempts: self.max_attempts,
        })
    }
}

/// One id candidate, no uniqueness check.
pub fn candidate_id(created_at: Option<i64>) -> String {
    match created_at {
        Some(ts) => {
            let digits = ts.unsigned_abs().to_string();
            let prefix = &digits[digits.len().saturating_sub(TIMESTAMP_DIGITS)..];
            format!("-{}{}", prefix, random_hex(SEEDED_HEX_LEN))
        }
        None => format!("-{}", random_hex(UNSEEDED_HEX_LEN)),
    }
}

fn random_hex(len: usize) -> String {
    let mut hex = String::with_capacity(len);
    while hex.len() < len {
        hex.push_str(&Uuid::new_v4().simple().to_string());
    }
    hex.truncate(len);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED_AT: i64 = 1_718_000_123_456;

    #[test]
    fn seeded_id_uses_last_eight_digits() {
        let id = candidate_id(Some(CREATED_AT));

        assert!(id.starts_with("-00123456"));
        assert_eq!(id.len(), 1 + 8 + 12);
        assert!(id[9..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn unseeded_id_is_twenty_hex() {
        let id = candidate_id(None);

        assert_eq!(id.len(), 21);
        assert!(id.starts_with('-'));
        assert!(id[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_timestamp_is_used_whole() {
        let id = candidate_id(Some(42));
        assert!(id.starts_with("-42"));
        assert_eq!(id.len(), 1 + 2 + 12);
    }

    #[test]
    fn same_timestamp_shares_prefix_but_differs() {
        let mut ids = IdentifierGenerator::new();
        let a = ids.generate(Some(CREATED_AT)).unwrap();
        let b = ids.generate(Some(CREATED_AT)).unwrap();

        assert_ne!(a, b);
        assert_eq!(a[..9], b[..9]);
        assert_eq!(ids.issued_count(), 2);
    }

    #[test]
    fn untracked_generator_keeps_no_state() {
        let mut ids = IdentifierGenerator::untracked();
        ids.register(["-existing"]);
        ids.generate(None).unwrap();

        assert!(!ids.is_tracking());
        assert_eq!(ids.issued_count(), 0);
    }

    #[test]
    fn zero_attempts_fails_when_tracking() {
        let mut ids = IdentifierGenerator::new().with_max_attempts(0);

        assert!(matches!(
            ids.generate(None),
            Err(PipelineError::IdentifierExhausted { attempts: 0 })
        ));
    }

    #[test]
    fn registered_ids_are_reserved() {
        let mut ids = IdentifierGenerator::new();
        ids.register(vec!["-a".to_string(), "-b".to_string()]);
        assert_eq!(ids.issued_count(), 2);
    }
}
