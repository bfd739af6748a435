//! Job listing rewrite-and-enrich pipeline.
//!
//! Takes raw job listings, asks an LLM to rewrite title and description into
//! search-friendly Turkish copy, gates the result on length and spam rules, and
//! fills missing structured fields (company, salary, id, status, timestamps)
//! from the rewritten text.
//!
//! # Modules
//!
//! - [`kernel`] - LLM seam (`BaseAI`), OpenAI implementation, retry policy
//! - [`domains::listings`] - records, rewrite client, extraction rules,
//!   quality gate, identifiers, pipeline and batch driver
//! - [`config`] - environment-driven configuration
//! - [`testing`] - mock implementations for tests

pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;
pub mod testing;

pub use config::Config;
pub use error::{OptimizerError, PipelineError};
pub use kernel::{BaseAI, OpenAIGenerator, RetryPolicy};

pub use domains::listings::{
    batch::{BatchDriver, BatchSummary},
    extraction::{extract_company, extract_salary, normalize_employment_type, ExtractionRule},
    identifiers::IdentifierGenerator,
    models::{EmploymentType, GenerationRequest, JobRecord},
    pipeline::{EnrichmentPipeline, Outcome},
    quality::{QualityGate, QualityVerdict},
    rewrite::{GenerationResult, RewriteClient, SPAM_MARKER, SPAM_SENTINEL},
};
