// Rejected-article pipeline: configuration and processing stages

pub mod pipeline_config;
pub mod processing;

// Re-export key types from each stage
pub use pipeline_config::{FailureAction, FailurePolicy, PipelineConfig};
pub use processing::normalize::{AuthorNameParser, IdentifierNormalizer};
pub use processing::{FilterPipeline, ProcessingOutcome, ProcessingReport, RecordBuilder};
