// Pipeline processing: field normalization, record building and batch filtering

pub mod builder;
pub mod filter;
pub mod normalize;

pub use builder::RecordBuilder;
pub use filter::{FilterPipeline, PipelineStage, ProcessingOutcome, ProcessingReport, SkippedRecord};
