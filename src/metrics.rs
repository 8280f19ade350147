//! Pipeline metrics
//!
//! Counters are emitted through the `metrics` facade and are no-ops until a
//! recorder is installed. The binary installs a Prometheus recorder and can
//! dump the rendered exposition text after a run.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

use crate::pipeline::ProcessingReport;

/// Metric names, prefixed by the pipeline they belong to.
pub mod names {
    pub const RUNS: &str = "tracker_pipeline_runs_total";
    pub const INPUT_RECORDS: &str = "tracker_pipeline_input_records_total";
    pub const OUTPUT_RECORDS: &str = "tracker_pipeline_output_records_total";
    pub const DROPPED_RECORDS: &str = "tracker_pipeline_dropped_records_total";
}

/// Metrics for the filter pipeline
pub struct PipelineMetrics;

impl PipelineMetrics {
    /// Record the counts of a finished run
    pub fn record_run(report: &ProcessingReport) {
        ::metrics::counter!(names::RUNS).increment(1);
        ::metrics::counter!(names::INPUT_RECORDS).increment(report.input_records as u64);
        ::metrics::counter!(names::OUTPUT_RECORDS).increment(report.output_records as u64);

        let dropped = [
            ("draft", report.drafts_dropped),
            ("incomplete", report.incomplete_dropped),
            ("duplicate", report.duplicates_dropped),
            ("accepted", report.accepted_dropped),
            ("skipped", report.skipped.len()),
        ];
        for (reason, count) in dropped {
            ::metrics::counter!(names::DROPPED_RECORDS, "reason" => reason)
                .increment(count as u64);
        }
    }
}

/// Install a Prometheus recorder without an HTTP listener and return a
/// handle for in-process rendering. Returns `None` if a recorder is already
/// installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus recorder installed");
            Some(handle)
        }
        Err(e) => {
            warn!("Prometheus recorder install failed (possibly already installed): {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_run_without_recorder_is_noop() {
        let report = ProcessingReport {
            input_records: 3,
            output_records: 1,
            duplicates_dropped: 2,
            ..ProcessingReport::default()
        };
        PipelineMetrics::record_run(&report);
    }
}
