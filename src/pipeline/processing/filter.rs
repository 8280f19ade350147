use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::constants::{
    AUTHORS, DECISION_DATE, FINAL_DECISION, MANUSCRIPT_ID, MANUSCRIPT_TITLE, SUBMISSION_DATE,
};
use crate::domain::{ArticleRecord, RawRecord};
use crate::error::{Result, TrackerError};
use crate::metrics::PipelineMetrics;
use crate::pipeline::pipeline_config::{FailureAction, PipelineConfig};
use crate::pipeline::processing::builder::RecordBuilder;
use crate::pipeline::processing::normalize::{dates, IdentifierNormalizer};

/// Stage of the filter pipeline a record was dropped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    IdentifierNormalization,
    Materialization,
}

/// A record dropped because it failed validation under a `Skip` policy.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    /// Zero-based position in the input batch
    pub position: usize,
    pub manuscript_id: Option<String>,
    pub stage: PipelineStage,
    pub reason: String,
}

/// Per-stage counts for one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingReport {
    pub input_records: usize,
    pub drafts_dropped: usize,
    pub incomplete_dropped: usize,
    pub duplicates_dropped: usize,
    pub accepted_dropped: usize,
    pub skipped: Vec<SkippedRecord>,
    pub output_records: usize,
}

/// Records produced by a run together with its report.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub records: Vec<ArticleRecord>,
    pub report: ProcessingReport,
}

/// A raw record on its way through the pipeline.
struct StagedRecord {
    position: usize,
    raw: RawRecord,
    key: String,
}

/// Selects the rejected manuscripts out of a tracking export.
///
/// Stages run in a fixed order over the whole batch: draft exclusion,
/// identifier normalization, submission date coercion (strict), decision
/// date coercion (lenient), completeness filter, last-write-wins
/// deduplication, accept filter and finally [`RecordBuilder`]. The accept
/// filter runs after deduplication so that a manuscript whose latest row is
/// accepted disappears entirely.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    config: PipelineConfig,
    identifiers: IdentifierNormalizer,
    builder: RecordBuilder,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline and return the surviving article records.
    pub fn process<I>(&self, raw_records: I) -> Result<Vec<ArticleRecord>>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        self.process_with_report(raw_records).map(|outcome| outcome.records)
    }

    /// Run the pipeline and also report what each stage dropped.
    pub fn process_with_report<I>(&self, raw_records: I) -> Result<ProcessingOutcome>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let raw_records: Vec<RawRecord> = raw_records.into_iter().collect();
        let span = tracing::info_span!("filter_pipeline", records = raw_records.len());
        let _enter = span.enter();

        let mut report = ProcessingReport {
            input_records: raw_records.len(),
            ..ProcessingReport::default()
        };

        let rows = self.exclude_drafts(raw_records, &mut report);
        let mut staged = self.normalize_identifiers(rows, &mut report)?;
        Self::coerce_submission_dates(&mut staged)?;
        Self::coerce_decision_dates(&mut staged);
        let staged = Self::drop_incomplete(staged, &mut report);
        let staged = Self::deduplicate(staged, &mut report);
        let staged = self.drop_accepted(staged, &mut report);
        let records = self.materialize(staged, &mut report)?;

        report.output_records = records.len();
        info!(
            input = report.input_records,
            output = report.output_records,
            drafts = report.drafts_dropped,
            incomplete = report.incomplete_dropped,
            duplicates = report.duplicates_dropped,
            accepted = report.accepted_dropped,
            skipped = report.skipped.len(),
            "Filter pipeline finished"
        );
        PipelineMetrics::record_run(&report);

        Ok(ProcessingOutcome { records, report })
    }

    fn exclude_drafts(
        &self,
        raw_records: Vec<RawRecord>,
        report: &mut ProcessingReport,
    ) -> Vec<(usize, RawRecord)> {
        let rows: Vec<(usize, RawRecord)> = raw_records
            .into_iter()
            .enumerate()
            .filter(|(_, raw)| !matches_sentinel(raw, MANUSCRIPT_ID, &self.config.draft_sentinel))
            .collect();
        report.drafts_dropped = report.input_records - rows.len();
        debug!(dropped = report.drafts_dropped, "Excluded draft rows");
        rows
    }

    fn normalize_identifiers(
        &self,
        rows: Vec<(usize, RawRecord)>,
        report: &mut ProcessingReport,
    ) -> Result<Vec<StagedRecord>> {
        let mut staged = Vec::with_capacity(rows.len());
        for (position, raw) in rows {
            match self.identifiers.normalize_opt(raw.text(MANUSCRIPT_ID).as_deref()) {
                Ok(key) => staged.push(StagedRecord { position, raw, key }),
                Err(err) => self.absorb_failure(
                    err,
                    position,
                    &raw,
                    PipelineStage::IdentifierNormalization,
                    report,
                )?,
            }
        }
        Ok(staged)
    }

    /// Replace every submission date cell with a parsed date. A cell that does
    /// not parse fails the batch; a missing one is left for the builder.
    fn coerce_submission_dates(staged: &mut [StagedRecord]) -> Result<()> {
        for record in staged.iter_mut() {
            match dates::parse_strict(SUBMISSION_DATE, record.raw.get(SUBMISSION_DATE)) {
                Ok(Some(date)) => record.raw.set(SUBMISSION_DATE, date),
                Ok(None) => {}
                Err(err) => {
                    warn!(position = record.position, error = %err, "Batch aborted");
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn coerce_decision_dates(staged: &mut [StagedRecord]) {
        for record in staged.iter_mut() {
            let decision = dates::parse_lenient(record.raw.get(DECISION_DATE));
            record.raw.set(DECISION_DATE, dates::decision_cell(decision));
        }
    }

    fn drop_incomplete(staged: Vec<StagedRecord>, report: &mut ProcessingReport) -> Vec<StagedRecord> {
        let before = staged.len();
        let kept: Vec<StagedRecord> = staged
            .into_iter()
            .filter(|r| r.raw.is_present(MANUSCRIPT_TITLE) && r.raw.is_present(AUTHORS))
            .collect();
        report.incomplete_dropped = before - kept.len();
        debug!(dropped = report.incomplete_dropped, "Dropped incomplete rows");
        kept
    }

    /// Keep the last row for each canonical id. Survivors stay in the order of
    /// their last occurrence.
    fn deduplicate(staged: Vec<StagedRecord>, report: &mut ProcessingReport) -> Vec<StagedRecord> {
        let mut last_seen: HashMap<String, usize> = HashMap::with_capacity(staged.len());
        for (index, record) in staged.iter().enumerate() {
            last_seen.insert(record.key.clone(), index);
        }

        let before = staged.len();
        let kept: Vec<StagedRecord> = staged
            .into_iter()
            .enumerate()
            .filter(|(index, record)| last_seen.get(&record.key) == Some(index))
            .map(|(_, record)| record)
            .collect();
        report.duplicates_dropped = before - kept.len();
        debug!(dropped = report.duplicates_dropped, "Removed duplicate manuscripts");
        kept
    }

    fn drop_accepted(
        &self,
        staged: Vec<StagedRecord>,
        report: &mut ProcessingReport,
    ) -> Vec<StagedRecord> {
        let before = staged.len();
        let kept: Vec<StagedRecord> = staged
            .into_iter()
            .filter(|r| !matches_sentinel(&r.raw, FINAL_DECISION, &self.config.accept_decision))
            .collect();
        report.accepted_dropped = before - kept.len();
        debug!(dropped = report.accepted_dropped, "Dropped accepted manuscripts");
        kept
    }

    fn materialize(
        &self,
        staged: Vec<StagedRecord>,
        report: &mut ProcessingReport,
    ) -> Result<Vec<ArticleRecord>> {
        let mut records = Vec::with_capacity(staged.len());
        for record in staged {
            match self.builder.build(&record.raw) {
                Ok(article) => records.push(article),
                Err(err) => self.absorb_failure(
                    err,
                    record.position,
                    &record.raw,
                    PipelineStage::Materialization,
                    report,
                )?,
            }
        }
        Ok(records)
    }

    /// Apply the failure policy: record a skip, or hand the error back.
    fn absorb_failure(
        &self,
        err: TrackerError,
        position: usize,
        raw: &RawRecord,
        stage: PipelineStage,
        report: &mut ProcessingReport,
    ) -> Result<()> {
        let action = err
            .kind()
            .map(|kind| self.config.failure_policy.action_for(kind))
            .unwrap_or(FailureAction::Abort);

        match action {
            FailureAction::Skip => {
                warn!(position, stage = ?stage, error = %err, "Skipping record");
                report.skipped.push(SkippedRecord {
                    position,
                    manuscript_id: raw.text(MANUSCRIPT_ID),
                    stage,
                    reason: err.to_string(),
                });
                Ok(())
            }
            FailureAction::Abort => {
                warn!(position, stage = ?stage, error = %err, "Batch aborted");
                Err(err)
            }
        }
    }
}

/// Case-sensitive match on the trimmed cell, the same text the builder keeps.
fn matches_sentinel(raw: &RawRecord, field: &str, sentinel: &str) -> bool {
    raw.text(field).as_deref() == Some(sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_config::FailurePolicy;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<RawRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn row(id: &str, title: &str, decision: &str) -> serde_json::Value {
        json!({
            "manuscript_id": id,
            "journal_name": "J",
            "manuscript_title": title,
            "submission_date": "2021-01-05",
            "decision_date": "2021-02-01",
            "authors": "Smith, Jane",
            "final_decision": decision
        })
    }

    #[test]
    fn test_output_keeps_order_of_last_occurrence() {
        let input = records(json!([
            row("A", "a1", "Reject"),
            row("B", "b1", "Reject"),
            row("a", "a2", "Reject"),
            row("C", "c1", "Reject"),
        ]));

        let out = FilterPipeline::new().process(input).unwrap();
        let titles: Vec<_> = out.iter().map(|r| r.manuscript_title.as_str()).collect();
        assert_eq!(titles, vec!["b1", "a2", "c1"]);
    }

    #[test]
    fn test_draft_is_case_sensitive() {
        let input = records(json!([row("draft", "d", "Reject"), row("Draft", "D", "Reject")]));
        let outcome = FilterPipeline::new().process_with_report(input).unwrap();
        assert_eq!(outcome.report.drafts_dropped, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].manuscript_id, "Draft");
    }

    #[test]
    fn test_accept_is_case_sensitive() {
        let input = records(json!([row("A", "a", "Accept"), row("B", "b", "accept")]));
        let out = FilterPipeline::new().process(input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].manuscript_id, "B");
    }

    #[test]
    fn test_sentinels_ignore_surrounding_whitespace() {
        let input = records(json!([
            row("A", "a", "Accept "),
            row(" draft", "d", "Reject"),
            row("B", "b", "\tAccept"),
            row("C", "c", "Reject"),
        ]));

        let outcome = FilterPipeline::new().process_with_report(input).unwrap();
        assert_eq!(outcome.report.drafts_dropped, 1);
        assert_eq!(outcome.report.accepted_dropped, 2);
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.records.iter().all(|r| r.final_decision != "Accept"));
    }

    #[test]
    fn test_custom_sentinels() {
        let config = PipelineConfig {
            draft_sentinel: "DRAFT".to_string(),
            accept_decision: "Accepted".to_string(),
            ..PipelineConfig::default()
        };
        let input = records(json!([
            row("DRAFT", "d", "Reject"),
            row("A", "a", "Accepted"),
            row("B", "b", "Accept"),
        ]));

        let out = FilterPipeline::with_config(config).process(input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].manuscript_id, "B");
    }

    #[test]
    fn test_missing_identifier_is_skipped_by_default() {
        let input = records(json!([row("", "x", "Reject"), row("B", "b", "Reject")]));
        let outcome = FilterPipeline::new().process_with_report(input).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.report.skipped.len(), 1);
        assert_eq!(outcome.report.skipped[0].position, 0);
        assert_eq!(outcome.report.skipped[0].stage, PipelineStage::IdentifierNormalization);
    }

    #[test]
    fn test_strict_policy_aborts_on_missing_field() {
        let config = PipelineConfig {
            failure_policy: FailurePolicy::strict(),
            ..PipelineConfig::default()
        };
        let mut bad = row("A", "a", "Reject");
        bad["journal_name"] = json!(null);
        let input = records(json!([bad, row("B", "b", "Reject")]));

        let err = FilterPipeline::with_config(config).process(input).unwrap_err();
        assert!(matches!(err, TrackerError::MissingField(f) if f == "journal_name"));
    }

    #[test]
    fn test_missing_submission_date_is_skipped() {
        let mut bad = row("A", "a", "Reject");
        bad["submission_date"] = json!(null);
        let input = records(json!([bad, row("B", "b", "Reject")]));

        let outcome = FilterPipeline::new().process_with_report(input).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.report.skipped[0].stage, PipelineStage::Materialization);
        assert!(outcome.report.skipped[0].reason.contains("submission_date"));
    }

    #[test]
    fn test_unparseable_submission_date_aborts_even_when_incomplete() {
        let mut bad = row("A", "", "Reject");
        bad["submission_date"] = json!("soon");
        let input = records(json!([row("B", "b", "Reject"), bad]));

        let err = FilterPipeline::new().process(input).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidDate { .. }));
    }

    #[test]
    fn test_report_counts() {
        let mut incomplete = row("C", "c", "Reject");
        incomplete["authors"] = json!(null);
        let input = records(json!([
            row("draft", "d", "Reject"),
            row("A", "a1", "Reject"),
            row("A.R1", "a2", "Reject"),
            incomplete,
            row("B", "b", "Accept"),
            row("E", "e", "Reject"),
        ]));

        let outcome = FilterPipeline::new().process_with_report(input).unwrap();
        let report = &outcome.report;
        assert_eq!(report.input_records, 6);
        assert_eq!(report.drafts_dropped, 1);
        assert_eq!(report.incomplete_dropped, 1);
        assert_eq!(report.duplicates_dropped, 1);
        assert_eq!(report.accepted_dropped, 1);
        assert!(report.skipped.is_empty());
        assert_eq!(report.output_records, 2);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = FilterPipeline::new().process_with_report(Vec::new()).unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.report.output_records, 0);
    }
}
