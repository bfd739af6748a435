use serde::Deserialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::{build_rewrite_prompt, GenerationResult};
use crate::domains::listings::models::GenerationRequest;
use crate::kernel::{BaseAI, RetryPolicy};

/// Why a raw response could not be turned into a rewrite.
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// Nothing that looks like a JSON object after removing code fences
    #[error("response does not start with a JSON object")]
    MissingObject,

    #[error("response JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response is missing a non-empty title or description")]
    MissingFields,
}

#[derive(Debug, Deserialize)]
struct RewrittenListing {
    #[serde(default, alias = "title")]
    new_title: Option<String>,

    #[serde(default, alias = "description")]
    new_description: Option<String>,
}

/// Strip code fences and decode the rewrite object.
pub fn parse_rewrite_response(raw: &str) -> Result<(String, String), ParseFailure> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    if !cleaned.starts_with('{') {
        return Err(ParseFailure::MissingObject);
    }

    let listing: RewrittenListing = serde_json::from_str(cleaned)?;

    match (listing.new_title, listing.new_description) {
        (Some(title), Some(description))
            if !title.trim().is_empty() && !description.trim().is_empty() =>
        {
            Ok((title, description))
        }
        _ => Err(ParseFailure::MissingFields),
    }
}

/// Rewrites listings through a [`BaseAI`] under a bounded [`RetryPolicy`].
pub struct RewriteClient<A: BaseAI> {
    ai: A,
    policy: RetryPolicy,
}

impl<A: BaseAI> RewriteClient<A> {
    pub fn new(ai: A) -> Self {
        Self {
            ai,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Request a rewrite, retrying service faults and fence-only replies.
    ///
    /// Replies that contain a JSON object which fails to decode are returned
    /// as `MalformedResponse` straight away unless the policy opts into
    /// retrying them.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let prompt = build_rewrite_prompt(request);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let raw = match self.ai.complete(&prompt).await {
                Ok(raw) => raw,
                Err(e) => {
                    if !self.policy.has_attempts_left(attempt) {
                        warn!(
                            error = %e,
                            attempts = attempt,
                            title = %request.title,
                            "Generation failed, retries exhausted"
                        );
                        return GenerationResult::TransientFailure;
                    }

                    let delay = self.policy.transient_delay_for(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Generation call failed, retrying"
                    );
                    sleep(delay).await;
                    continue;
                }
            };

            debug!(attempt, response_length = raw.len(), "Generation response received");

            let failure = match parse_rewrite_response(&raw) {
                Ok((title, description)) => {
                    return GenerationResult::Success { title, description };
                }
                Err(failure) => failure,
            };

            let retryable = matches!(failure, ParseFailure::MissingObject)
                || self.policy.retry_invalid_json;

            if retryable && self.policy.has_attempts_left(attempt) {
                let delay = self.policy.format_delay_for(attempt);
                warn!(
                    error = %failure,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Unusable generation response, retrying"
                );
                sleep(delay).await;
                continue;
            }

            warn!(
                error = %failure,
                attempts = attempt,
                response_preview = %preview(&raw),
                "Generation response rejected"
            );
            return GenerationResult::MalformedResponse;
        }
    }
}

fn preview(raw: &str) -> String {
    raw.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::listings::rewrite::SPAM_SENTINEL;
    use crate::testing::{listing_json, MockAI};
    use std::sync::Arc;

    fn request() -> GenerationRequest {
        GenerationRequest {
            title: "Garson".to_string(),
            description: "Kafe için garson aranıyor".to_string(),
            category: "Yiyecek".to_string(),
            location: "Ankara".to_string(),
        }
    }

    fn client(ai: &Arc<MockAI>, attempts: u32) -> RewriteClient<Arc<MockAI>> {
        RewriteClient::new(ai.clone()).with_policy(RetryPolicy::immediate(attempts))
    }

    #[test]
    fn parses_fenced_json() {
        let parsed = parse_rewrite_response(&listing_json("Başlık", "Açıklama")).unwrap();
        assert_eq!(parsed, ("Başlık".to_string(), "Açıklama".to_string()));
    }

    #[test]
    fn accepts_plain_key_aliases() {
        let parsed =
            parse_rewrite_response(r#"{"title": "Başlık", "description": "Açıklama"}"#).unwrap();
        assert_eq!(parsed.0, "Başlık");
    }

    #[test]
    fn classifies_parse_failures() {
        assert!(matches!(
            parse_rewrite_response("Sure! Here is your listing"),
            Err(ParseFailure::MissingObject)
        ));
        assert!(matches!(
            parse_rewrite_response(r#"{"new_title": "a", "#),
            Err(ParseFailure::InvalidJson(_))
        ));
        assert!(matches!(
            parse_rewrite_response(r#"{"new_title": "a", "new_description": " "}"#),
            Err(ParseFailure::MissingFields)
        ));
    }

    #[tokio::test]
    async fn retries_service_faults_until_success() {
        let ai = Arc::new(
            MockAI::new()
                .with_failure("503")
                .with_failure("timeout")
                .with_listing("Yeni başlık", "Yeni açıklama"),
        );

        let result = client(&ai, 5).generate(&request()).await;

        assert_eq!(
            result,
            GenerationResult::Success {
                title: "Yeni başlık".to_string(),
                description: "Yeni açıklama".to_string(),
            }
        );
        assert_eq!(ai.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_faults_are_transient_failure() {
        let ai = Arc::new(MockAI::new());

        let result = client(&ai, 3).generate(&request()).await;

        assert_eq!(result, GenerationResult::TransientFailure);
        assert_eq!(ai.call_count(), 3);
    }

    #[tokio::test]
    async fn retries_responses_without_json_object() {
        let ai = Arc::new(
            MockAI::new()
                .with_response("I cannot help with that.")
                .with_listing("Başlık", "Açıklama"),
        );

        let result = client(&ai, 5).generate(&request()).await;

        assert!(matches!(result, GenerationResult::Success { .. }));
        assert_eq!(ai.call_count(), 2);
    }

    #[tokio::test]
    async fn invalid_json_is_not_retried_by_default() {
        let ai = Arc::new(
            MockAI::new()
                .with_response(r#"{"new_title": "broken"#)
                .with_listing("Başlık", "Açıklama"),
        );

        let result = client(&ai, 5).generate(&request()).await;

        assert_eq!(result, GenerationResult::MalformedResponse);
        assert_eq!(ai.call_count(), 1);
    }

    #[tokio::test]
    async fn invalid_json_retry_can_be_enabled() {
        let ai = Arc::new(
            MockAI::new()
                .with_response(r#"{"new_title": "broken"#)
                .with_listing("Başlık", "Açıklama"),
        );
        let client = RewriteClient::new(ai.clone())
            .with_policy(RetryPolicy::immediate(5).with_retry_invalid_json(true));

        let result = client.generate(&request()).await;

        assert!(matches!(result, GenerationResult::Success { .. }));
        assert_eq!(ai.call_count(), 2);
    }

    #[tokio::test]
    async fn sentinel_output_is_returned_as_success() {
        let ai = Arc::new(MockAI::new().with_listing(SPAM_SENTINEL, SPAM_SENTINEL));

        let result = client(&ai, 1).generate(&request()).await;

        assert_eq!(
            result,
            GenerationResult::Success {
                title: SPAM_SENTINEL.to_string(),
                description: SPAM_SENTINEL.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn sends_prompt_with_request_fields() {
        let ai = Arc::new(MockAI::new().with_listing("a", "b"));

        client(&ai, 1).generate(&request()).await;

        let prompts = ai.calls();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Kafe için garson aranıyor"));
    }
}
