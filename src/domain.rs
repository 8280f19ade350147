//! Record shapes shared across the pipeline: the untyped rows coming out of
//! a tracking export and the canonical article records handed to reporting.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::UNKNOWN_DATE;
use crate::error::Result;

/// A single untyped cell value as delivered by the import step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Whether the cell carries a usable value. Blank text and NaN count as missing.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Float(f) => !f.is_nan(),
            _ => true,
        }
    }

    /// Text rendering of the value, trimmed. `None` when the value is missing.
    pub fn as_text(&self) -> Option<String> {
        if !self.is_present() {
            return None;
        }
        let text = match self {
            FieldValue::Null => return None,
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(i) => i.to_string(),
            // Spreadsheet exports turn integer ids into floats
            FieldValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{:.0}", f),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        Some(text)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// One row of the tracking export, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for assembling records in code.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Trimmed text of a field, `None` when absent or blank.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Text of a field as it appeared in the export, surrounding whitespace
    /// included. `None` when absent or blank.
    pub fn source_text(&self, field: &str) -> Option<String> {
        match self.get(field) {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => Some(s.clone()),
            other => other.and_then(FieldValue::as_text),
        }
    }

    pub fn is_present(&self, field: &str) -> bool {
        self.get(field).map(FieldValue::is_present).unwrap_or(false)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A structured author name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    pub last_name: String,
    pub first_names: String,
}

impl AuthorName {
    pub fn new(last_name: impl Into<String>, first_names: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            first_names: first_names.into(),
        }
    }
}

/// Decision date of a manuscript, which may not be known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DecisionDate {
    Known(NaiveDate),
    Unknown,
}

impl DecisionDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DecisionDate::Known(d) => Some(*d),
            DecisionDate::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, DecisionDate::Unknown)
    }
}

impl From<Option<NaiveDate>> for DecisionDate {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map(DecisionDate::Known).unwrap_or(DecisionDate::Unknown)
    }
}

impl fmt::Display for DecisionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionDate::Known(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DecisionDate::Unknown => f.write_str(UNKNOWN_DATE),
        }
    }
}

impl From<DecisionDate> for String {
    fn from(value: DecisionDate) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DecisionDate {
    type Error = chrono::ParseError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if value == UNKNOWN_DATE {
            return Ok(DecisionDate::Unknown);
        }
        NaiveDate::parse_from_str(&value, "%Y-%m-%d").map(DecisionDate::Known)
    }
}

/// Canonical rejected-article record, one per manuscript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Identifier exactly as it appeared in the export, whitespace included
    pub manuscript_id: String,
    /// Normalized identifier used as the deduplication key
    pub raw_manuscript_id: String,
    pub journal_name: String,
    pub manuscript_title: String,
    pub submission_date: NaiveDate,
    pub decision_date: DecisionDate,
    pub authors: Vec<AuthorName>,
    /// `submission_date` rendered as `YYYY-MM-DD`
    pub text_sub_date: String,
    pub final_decision: String,
}

impl ArticleRecord {
    /// Plain key-value form for export collaborators.
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}
