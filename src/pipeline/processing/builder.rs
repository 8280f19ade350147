use crate::constants::{
    AUTHORS, DECISION_DATE, FINAL_DECISION, JOURNAL_NAME, MANUSCRIPT_ID, MANUSCRIPT_TITLE,
    SUBMISSION_DATE,
};
use crate::domain::{ArticleRecord, RawRecord};
use crate::error::{Result, TrackerError};
use crate::pipeline::processing::normalize::{dates, AuthorNameParser, IdentifierNormalizer};

/// Turns one validated raw record into an [`ArticleRecord`].
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    identifiers: IdentifierNormalizer,
    authors: AuthorNameParser,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the canonical record.
    ///
    /// Required fields are checked in export order and the first absent one is
    /// reported as `MissingField`. A submission date that does not parse is
    /// `InvalidDate`; a decision date that does not parse becomes unknown.
    pub fn build(&self, raw: &RawRecord) -> Result<ArticleRecord> {
        let manuscript_id = raw
            .source_text(MANUSCRIPT_ID)
            .ok_or_else(|| TrackerError::MissingField(MANUSCRIPT_ID.to_string()))?;
        let journal_name = required(raw, JOURNAL_NAME)?;
        let manuscript_title = required(raw, MANUSCRIPT_TITLE)?;

        let submission_date = dates::parse_strict(SUBMISSION_DATE, raw.get(SUBMISSION_DATE))?
            .ok_or_else(|| TrackerError::MissingField(SUBMISSION_DATE.to_string()))?;

        let authors = self.authors.parse_opt(raw.text(AUTHORS).as_deref());
        if authors.is_empty() {
            return Err(TrackerError::MissingField(AUTHORS.to_string()));
        }

        let final_decision = required(raw, FINAL_DECISION)?;
        let raw_manuscript_id = self.identifiers.normalize(&manuscript_id)?;
        let decision_date = dates::parse_lenient(raw.get(DECISION_DATE));

        Ok(ArticleRecord {
            text_sub_date: submission_date.format("%Y-%m-%d").to_string(),
            manuscript_id,
            raw_manuscript_id,
            journal_name,
            manuscript_title,
            submission_date,
            decision_date,
            authors,
            final_decision,
        })
    }
}

fn required(raw: &RawRecord, field: &str) -> Result<String> {
    raw.text(field)
        .ok_or_else(|| TrackerError::MissingField(field.to_string()))
}
