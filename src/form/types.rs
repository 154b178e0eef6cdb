// Core types for the report form workflow

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const REQUIRED_FIELD_MESSAGE: &str = "This field is required";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// Fields the report form refuses to submit without.
pub const DEFAULT_REQUIRED_FIELDS: [&str; 5] =
    ["program", "severity", "title", "description", "impact"];

/// Kind of input element backing a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Select,
    TextArea,
}

/// Metadata and current value for one form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub required: bool,
    pub kind: FieldKind,
    pub current_value: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            required: false,
            kind,
            current_value: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.current_value = value.into();
        self
    }
}

/// Why a single field failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("This field is required")]
    MissingRequiredField,
    #[error("{}", malformed_message(.kind))]
    MalformedValue { kind: FieldKind },
}

fn malformed_message(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Email => INVALID_EMAIL_MESSAGE,
        _ => "Please enter a valid value",
    }
}

/// Result of checking one field at interaction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidationOutcome {
    Valid,
    Invalid(ValidationIssue),
}

impl FieldValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldValidationOutcome::Valid)
    }

    pub fn message(&self) -> Option<String> {
        match self {
            FieldValidationOutcome::Valid => None,
            FieldValidationOutcome::Invalid(issue) => Some(issue.to_string()),
        }
    }
}

/// Field values captured at one instant, in form order.
///
/// Inserting a name twice keeps its original position and the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    values: IndexMap<String, String>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Absent or whitespace-only
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).map_or(true, |value| value.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Empties every value while keeping the field names.
    pub fn reset_values(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = FormSnapshot::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

/// Outcome of an aggregate validation pass. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    errors_by_field: IndexMap<String, String>,
}

impl ValidationResult {
    pub(crate) fn from_errors(errors_by_field: IndexMap<String, String>) -> Self {
        Self { errors_by_field }
    }

    pub fn is_valid(&self) -> bool {
        self.errors_by_field.is_empty()
    }

    pub fn errors_by_field(&self) -> &IndexMap<String, String> {
        &self.errors_by_field
    }

    pub fn error_for(&self, field_name: &str) -> Option<&str> {
        self.errors_by_field.get(field_name).map(String::as_str)
    }
}

/// Lifecycle phase of one form's submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::Validating | SubmissionState::Submitting)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Validating => "validating",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The submit button as the workflow knows it: its resting and busy labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub label: String,
    pub busy_label: String,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            label: "Submit Report".to_string(),
            busy_label: "Submitting...".to_string(),
        }
    }
}

/// Declared fields of a form, in markup order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// The bug report form: five required inputs plus an optional contact email.
    pub fn report_form() -> Self {
        Self::new(vec![
            FieldDescriptor::new("program", FieldKind::Select).required(),
            FieldDescriptor::new("severity", FieldKind::Select).required(),
            FieldDescriptor::new("title", FieldKind::Text).required(),
            FieldDescriptor::new("description", FieldKind::TextArea).required(),
            FieldDescriptor::new("impact", FieldKind::TextArea).required(),
            FieldDescriptor::new("email", FieldKind::Email),
        ])
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Descriptor for `name` carrying `value`, if the form declares that field.
    pub fn describe(&self, name: &str, value: &str) -> Option<FieldDescriptor> {
        self.field(name).map(|field| field.clone().with_value(value))
    }

    /// Every declared field with an empty value.
    pub fn blank_snapshot(&self) -> FormSnapshot {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), String::new()))
            .collect()
    }

    pub(crate) fn duplicate_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .filter(|field| !seen.insert(field.name.as_str()))
            .map(|field| field.name.clone())
            .collect()
    }
}

/// Acknowledgement returned by a transport that accepted a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: String,
    pub accepted_at: DateTime<Utc>,
}
