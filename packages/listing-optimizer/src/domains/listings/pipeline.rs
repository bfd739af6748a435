//! Per-record enrichment: rewrite, gate, then fill missing fields.

use chrono::Utc;
use tracing::{info, warn};

use super::extraction::{extract_company, extract_salary, normalize_employment_type};
use super::identifiers::IdentifierGenerator;
use super::models::{JobRecord, DEFAULT_STATUS, SALARY_UNKNOWN};
use super::quality::QualityGate;
use super::rewrite::{GenerationResult, RewriteClient};
use crate::error::PipelineError;
use crate::kernel::BaseAI;

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Rewritten and gap-filled
    Enriched,
    /// Rewritten with the manual-review marker, not gap-filled
    Flagged,
    /// Left as it was
    Failed,
}

pub struct EnrichmentPipeline<A: BaseAI> {
    client: RewriteClient<A>,
    gate: QualityGate,
    ids: IdentifierGenerator,
}

impl<A: BaseAI> EnrichmentPipeline<A> {
    pub fn new(client: RewriteClient<A>) -> Self {
        Self {
            client,
            gate: QualityGate::new(),
            ids: IdentifierGenerator::new(),
        }
    }

    pub fn with_quality_gate(mut self, gate: QualityGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_identifier_generator(mut self, ids: IdentifierGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn identifiers_mut(&mut self) -> &mut IdentifierGenerator {
        &mut self.ids
    }

    /// Rewrite and enrich one record.
    ///
    /// Generation failures come back as `Outcome::Failed` with the record
    /// untouched. An `Err` means gap-filling hit a fault the caller has to
    /// handle; the record passed in is consumed in that case.
    pub async fn process(
        &mut self,
        mut record: JobRecord,
    ) -> Result<(JobRecord, Outcome), PipelineError> {
        let request = record.generation_request();

        let (title, description) = match self.client.generate(&request).await {
            GenerationResult::Success { title, description } => (title, description),
            failure => {
                warn!(title = %record.title, result = ?failure, "Listing rewrite failed");
                return Ok((record, Outcome::Failed));
            }
        };

        let verdict = self.gate.evaluate(&record, &title, &description);

        if verdict.is_spam() {
            info!(title = %record.title, "Listing routed to manual review");
            record.title = title;
            record.description = description;
            return Ok((record, Outcome::Flagged));
        }

        if !verdict.issues().is_empty() {
            warn!(
                title = %title,
                issues = %verdict.issues().join(", "),
                "Rewrite has quality warnings"
            );
        }

        record.title = title;
        record.description = description;

        let filled = fill_gaps(&mut record, &mut self.ids, Utc::now().timestamp_millis())?;

        info!(
            title = %record.title,
            title_length = record.title.chars().count(),
            description_length = record.description.chars().count(),
            filled = ?filled,
            "Listing enriched"
        );

        Ok((record, Outcome::Enriched))
    }
}

/// Fill unset fields from the (already rewritten) description.
///
/// Present, non-default values are never overwritten. Returns the names of
/// the fields that were set.
pub fn fill_gaps(
    record: &mut JobRecord,
    ids: &mut IdentifierGenerator,
    now_ms: i64,
) -> Result<Vec<&'static str>, PipelineError> {
    let mut filled = Vec::new();

    if record.company_is_unset() {
        record.company = Some(extract_company(&record.description));
        filled.push("company");
    }

    if record.salary_is_unset() {
        let salary = extract_salary(&record.description);
        if salary != SALARY_UNKNOWN {
            record.salary = Some(salary);
            filled.push("salary");
        }
    }

    if record.job_id_is_unset() {
        record.job_id = Some(ids.generate(record.created_at)?);
        filled.push("jobId");
    }

    if record.created_at.is_none() {
        record.created_at = Some(now_ms);
        filled.push("createdAt");
    }

    if record.status_is_unset() {
        record.status = Some(DEFAULT_STATUS.to_string());
        filled.push("status");
    }

    if record.employment_type.is_none() {
        if let Some(label) = record.employment_label.as_deref() {
            record.employment_type = Some(normalize_employment_type(label));
            filled.push("employmentType");
        }
    }

    Ok(filled)
}
