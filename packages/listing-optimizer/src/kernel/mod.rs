//! Kernel module - LLM infrastructure shared by the listings domain.

pub mod openai;
pub mod retry;
pub mod traits;

pub use openai::OpenAIGenerator;
pub use retry::RetryPolicy;
pub use traits::*;

/// Default chat model for listing rewrites.
pub const GPT_4O: &str = "gpt-4o";
