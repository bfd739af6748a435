// Kernel traits - infrastructure seams
//
// Naming convention: Base* for trait names (e.g., BaseAI)

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

/// Opaque text generation capability: prompt in, raw text out.
///
/// Any error is treated as transient by callers and retried under their
/// own policy, so implementations should not retry internally.
#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: BaseAI + ?Sized> BaseAI for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}
