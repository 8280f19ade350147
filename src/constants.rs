/// Field names used by the tracking export. These are the keys of a raw record
/// and of the serialized article record.
pub const MANUSCRIPT_ID: &str = "manuscript_id";
pub const JOURNAL_NAME: &str = "journal_name";
pub const MANUSCRIPT_TITLE: &str = "manuscript_title";
pub const SUBMISSION_DATE: &str = "submission_date";
pub const DECISION_DATE: &str = "decision_date";
pub const AUTHORS: &str = "authors";
pub const FINAL_DECISION: &str = "final_decision";

/// Required fields, in the order they are validated.
pub const REQUIRED_FIELDS: [&str; 6] = [
    MANUSCRIPT_ID,
    JOURNAL_NAME,
    MANUSCRIPT_TITLE,
    SUBMISSION_DATE,
    AUTHORS,
    FINAL_DECISION,
];

// Sentinel values written by the export (compared case-sensitively)
pub const DRAFT_MANUSCRIPT_ID: &str = "draft";
pub const ACCEPT_DECISION: &str = "Accept";

/// Rendering of a decision date that could not be determined.
pub const UNKNOWN_DATE: &str = "unknown";

pub const AUTHOR_DELIMITER: char = ';';
pub const AUTHOR_NAME_SEPARATOR: char = ',';

/// Default location of the TOML configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "tracker.toml";
