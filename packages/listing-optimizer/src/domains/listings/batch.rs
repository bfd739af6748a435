//! Batch driver - runs every listing in a file through the pipeline.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};

use super::models::JobRecord;
use super::pipeline::{EnrichmentPipeline, Outcome};
use crate::error::{OptimizerError, Result};
use crate::kernel::BaseAI;

/// Counters and output of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub flagged: usize,
    pub failed: usize,
    /// Output records, in input order
    pub records: Vec<JobRecord>,
}

impl BatchSummary {
    fn with_capacity(total: usize) -> Self {
        Self {
            total,
            records: Vec::with_capacity(total),
            ..Default::default()
        }
    }

    fn push(&mut self, record: JobRecord, outcome: Outcome) {
        match outcome {
            Outcome::Enriched => self.succeeded += 1,
            Outcome::Flagged => self.flagged += 1,
            Outcome::Failed => self.failed += 1,
        }
        self.records.push(record);
    }

    /// Share of records enriched, as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Listing optimization report")?;
        writeln!(f, "  Total listings:     {}", self.total)?;
        writeln!(f, "  Optimized:          {}", self.succeeded)?;
        writeln!(f, "  Manual review:      {}", self.flagged)?;
        writeln!(f, "  Failed:             {}", self.failed)?;
        write!(f, "  Success rate:       {:.1}%", self.success_rate())
    }
}

pub struct BatchDriver<A: BaseAI> {
    pipeline: EnrichmentPipeline<A>,
    record_delay: Duration,
    progress_every: usize,
}

impl<A: BaseAI> BatchDriver<A> {
    pub fn new(pipeline: EnrichmentPipeline<A>) -> Self {
        Self {
            pipeline,
            record_delay: Duration::from_millis(1500),
            progress_every: 10,
        }
    }

    /// Pause between two records, to stay under provider rate limits.
    pub fn with_record_delay(mut self, delay: Duration) -> Self {
        self.record_delay = delay;
        self
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }

    /// Process every record in order. Never fails: a record whose pipeline
    /// step errors is kept as it was and counted as failed.
    pub async fn run(&mut self, records: Vec<JobRecord>) -> BatchSummary {
        let existing_ids = records
            .iter()
            .filter(|r| !r.job_id_is_unset())
            .filter_map(|r| r.job_id.clone());
        self.pipeline.identifiers_mut().register(existing_ids);

        let total = records.len();
        let mut summary = BatchSummary::with_capacity(total);

        info!(total, "Starting listing optimization");

        for (index, record) in records.into_iter().enumerate() {
            if index > 0 && !self.record_delay.is_zero() {
                sleep(self.record_delay).await;
            }

            let position = index + 1;
            info!(position, total, title = %record.title, "Processing listing");

            let untouched = record.clone();
            let (record, outcome) = match self.pipeline.process(record).await {
                Ok(processed) => processed,
                Err(e) => {
                    error!(error = %e, position, title = %untouched.title, "Listing enrichment failed");
                    (untouched, Outcome::Failed)
                }
            };

            summary.push(record, outcome);

            if position % self.progress_every == 0 {
                info!(
                    processed = position,
                    total,
                    percent = %format!("{:.1}", position as f64 / total as f64 * 100.0),
                    "Progress"
                );
            }
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            flagged = summary.flagged,
            failed = summary.failed,
            "Listing optimization finished"
        );

        summary
    }

    /// Load `input`, run the batch, and write every record to `output`.
    pub async fn run_file(&mut self, input: &Path, output: &Path) -> Result<BatchSummary> {
        let records = load_records(input).await?;
        let summary = self.run(records).await;
        write_records(output, &summary.records).await?;

        info!(path = %output.display(), records = summary.records.len(), "Listings written");
        Ok(summary)
    }
}

/// Read a JSON array of listings.
pub async fn load_records(path: &Path) -> Result<Vec<JobRecord>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| OptimizerError::InputLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    serde_json::from_str(&raw).map_err(|e| OptimizerError::InputLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

/// Write listings as an indented JSON array, non-ASCII left as is.
pub async fn write_records(path: &Path, records: &[JobRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(|e| OptimizerError::OutputWrite {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    tokio::fs::write(path, json)
        .await
        .map_err(|e| OptimizerError::OutputWrite {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::listings::identifiers::IdentifierGenerator;
    use crate::domains::listings::rewrite::{RewriteClient, SPAM_SENTINEL};
    use crate::kernel::RetryPolicy;
    use crate::testing::{filler, MockAI};
    use std::sync::Arc;

    fn driver(ai: &Arc<MockAI>) -> BatchDriver<Arc<MockAI>> {
        let client = RewriteClient::new(ai.clone()).with_policy(RetryPolicy::immediate(1));
        BatchDriver::new(EnrichmentPipeline::new(client)).with_record_delay(Duration::ZERO)
    }

    fn records(n: usize) -> Vec<JobRecord> {
        (0..n)
            .map(|i| JobRecord::new(format!("İlan {}", i), "Eleman aranıyor"))
            .collect()
    }

    #[tokio::test]
    async fn counts_each_outcome_once() {
        let ai = Arc::new(
            MockAI::new()
                .with_listing(&filler(55), &filler(1200))
                .with_listing(SPAM_SENTINEL, SPAM_SENTINEL)
                .with_response("not json at all"),
        );

        let summary = driver(&ai).run(records(3)).await;

        assert_eq!(summary.total, 3);
        assert_eq!(
            (summary.succeeded, summary.flagged, summary.failed),
            (1, 1, 1)
        );
        assert_eq!(summary.records.len(), 3);
        assert_eq!(summary.records[2].title, "İlan 2");
    }

    #[tokio::test]
    async fn pipeline_errors_keep_the_original_record() {
        let ai = Arc::new(MockAI::new().with_fallback_listing(&filler(55), &filler(1200)));
        let client = RewriteClient::new(ai.clone()).with_policy(RetryPolicy::immediate(1));
        let pipeline = EnrichmentPipeline::new(client)
            .with_identifier_generator(IdentifierGenerator::new().with_max_attempts(0));
        let mut driver = BatchDriver::new(pipeline).with_record_delay(Duration::ZERO);

        let input = records(2);
        let summary = driver.run(input.clone()).await;

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.records, input);
    }

    #[tokio::test]
    async fn empty_batch_reports_zero_rate() {
        let ai = Arc::new(MockAI::new());
        let summary = driver(&ai).run(Vec::new()).await;

        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate(), 0.0);
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_records_only() {
        let ai = Arc::new(MockAI::new().with_fallback_listing(&filler(55), &filler(1200)));
        let client = RewriteClient::new(ai.clone()).with_policy(RetryPolicy::immediate(1));
        let mut driver = BatchDriver::new(EnrichmentPipeline::new(client))
            .with_record_delay(Duration::from_millis(1500));

        let started = tokio::time::Instant::now();
        let summary = driver.run(records(3)).await;
        let elapsed = started.elapsed();

        assert_eq!(summary.succeeded, 3);
        assert!(elapsed >= Duration::from_millis(3000), "waited {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(4500), "waited {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn single_record_does_not_wait() {
        let ai = Arc::new(MockAI::new().with_fallback_listing(&filler(55), &filler(1200)));
        let client = RewriteClient::new(ai.clone()).with_policy(RetryPolicy::immediate(1));
        let mut driver = BatchDriver::new(EnrichmentPipeline::new(client));

        let started = tokio::time::Instant::now();
        driver.run(records(1)).await;

        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn progress_reporting_every_record_keeps_counts() {
        let ai = Arc::new(MockAI::new().with_fallback_listing(&filler(55), &filler(1200)));
        let mut driver = driver(&ai).with_progress_every(1);

        let summary = driver.run(records(4)).await;

        assert_eq!(summary.succeeded, 4);
        assert_eq!(ai.call_count(), 4);
    }

    #[test]
    fn progress_interval_is_at_least_one() {
        let ai = Arc::new(MockAI::new());
        assert_eq!(driver(&ai).with_progress_every(0).progress_every, 1);
    }

    #[test]
    fn report_shows_percentage() {
        let summary = BatchSummary {
            total: 4,
            succeeded: 3,
            flagged: 1,
            failed: 0,
            records: Vec::new(),
        };

        let report = summary.to_string();
        assert!(report.contains("Total listings:     4"));
        assert!(report.contains("Manual review:      1"));
        assert!(report.contains("75.0%"));
    }
}
