//! Testing utilities including mock implementations.
//!
//! Lets tests drive the rewrite pipeline without making real LLM calls.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::kernel::BaseAI;

/// A scripted reply from the mock AI.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// A mock AI that replays scripted responses in order.
///
/// When the script runs out it answers with the fallback response if one is
/// set, otherwise with an error.
#[derive(Clone, Default)]
pub struct MockAI {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    fallback: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw text response.
    pub fn with_response(self, raw: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(raw.into()));
        self
    }

    /// Queue a well-formed rewrite response.
    pub fn with_listing(self, title: &str, description: &str) -> Self {
        self.with_response(listing_json(title, description))
    }

    /// Queue a failed call.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Fail(message.into()));
        self
    }

    /// Answer every unscripted call with this rewrite.
    pub fn with_fallback_listing(mut self, title: &str, description: &str) -> Self {
        self.fallback = Some(listing_json(title, description));
        self
    }

    /// Prompts received so far.
    pub fn calls(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(MockReply::Text(raw)) => Ok(raw),
            Some(MockReply::Fail(message)) => Err(anyhow!(message)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| anyhow!("MockAI has no scripted response left")),
        }
    }
}

/// Serialize a rewrite the way the model is asked to answer, fenced.
pub fn listing_json(title: &str, description: &str) -> String {
    let body = serde_json::json!({
        "new_title": title,
        "new_description": description,
    });
    format!("```json\n{}\n```", body)
}

/// Turkish filler text of exactly `len` characters.
pub fn filler(len: usize) -> String {
    const SENTENCE: &str = "Ekibimize katılacak çalışma arkadaşları arıyoruz. ";
    SENTENCE.chars().cycle().take(len).collect()
}
