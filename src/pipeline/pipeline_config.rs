use serde::{Deserialize, Serialize};

use crate::constants::{ACCEPT_DECISION, DRAFT_MANUSCRIPT_ID};
use crate::error::RecordErrorKind;

/// What to do with a record that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureAction {
    /// Drop the record and keep processing the batch
    Skip,
    /// Fail the whole batch
    Abort,
}

/// Maps record-level error kinds to a [`FailureAction`].
///
/// An unparseable submission date always aborts the batch; it is the field
/// downstream ordering depends on and has no fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailurePolicy {
    pub missing_field: FailureAction,
    pub invalid_identifier: FailureAction,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            missing_field: FailureAction::Skip,
            invalid_identifier: FailureAction::Skip,
        }
    }
}

impl FailurePolicy {
    pub fn action_for(&self, kind: RecordErrorKind) -> FailureAction {
        match kind {
            RecordErrorKind::MissingField => self.missing_field,
            RecordErrorKind::InvalidIdentifier => self.invalid_identifier,
            RecordErrorKind::InvalidDate => FailureAction::Abort,
        }
    }

    /// Abort on every record-level failure.
    pub fn strict() -> Self {
        Self {
            missing_field: FailureAction::Abort,
            invalid_identifier: FailureAction::Abort,
        }
    }
}

/// Configuration for a filter pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Manuscript id marking a draft row (exact match)
    pub draft_sentinel: String,
    /// Final decision marking an accepted manuscript (exact match)
    pub accept_decision: String,
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            draft_sentinel: DRAFT_MANUSCRIPT_ID.to_string(),
            accept_decision: ACCEPT_DECISION.to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = FailurePolicy::default();
        assert_eq!(policy.action_for(RecordErrorKind::MissingField), FailureAction::Skip);
        assert_eq!(policy.action_for(RecordErrorKind::InvalidIdentifier), FailureAction::Skip);
        assert_eq!(policy.action_for(RecordErrorKind::InvalidDate), FailureAction::Abort);
    }

    #[test]
    fn test_invalid_date_always_aborts() {
        let policy = FailurePolicy::strict();
        assert_eq!(policy.action_for(RecordErrorKind::InvalidDate), FailureAction::Abort);
        assert_eq!(policy.action_for(RecordErrorKind::MissingField), FailureAction::Abort);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            accept_decision = "Accepted"

            [failure_policy]
            missing_field = "abort"
            "#,
        )
        .unwrap();

        assert_eq!(config.draft_sentinel, "draft");
        assert_eq!(config.accept_decision, "Accepted");
        assert_eq!(config.failure_policy.missing_field, FailureAction::Abort);
        assert_eq!(config.failure_policy.invalid_identifier, FailureAction::Skip);
    }
}
