//! Turns a journal's manuscript-tracking export into one canonical record per
//! rejected manuscript.
//!
//! ```
//! use rejected_article_tracker::{FilterPipeline, RawRecord};
//!
//! let rows: Vec<RawRecord> = serde_json::from_str(r#"[
//!     {"manuscript_id": "M1", "journal_name": "J", "manuscript_title": "T",
//!      "submission_date": "2021-01-05", "decision_date": "2021-02-01",
//!      "authors": "Smith, Jane; Doe, John", "final_decision": "Reject"}
//! ]"#).unwrap();
//!
//! let articles = FilterPipeline::new().process(rows).unwrap();
//! assert_eq!(articles[0].raw_manuscript_id, "M1");
//! ```

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;

pub use domain::{ArticleRecord, AuthorName, DecisionDate, FieldValue, RawRecord};
pub use error::{Result, TrackerError};
pub use pipeline::{FilterPipeline, PipelineConfig, ProcessingOutcome, ProcessingReport};
