// Field and form validation rules
//
// Two tiers: format checks run per field on blur, required-field coverage runs
// over the whole snapshot on submit. The submit pass does not re-check email
// shape.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::form::types::*;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// `local@domain.tld` shape: no whitespace, exactly one `@`, a dot after it.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Check a single field the way a blur event does.
pub fn check_field(field: &FieldDescriptor) -> FieldValidationOutcome {
    let value = field.current_value.trim();

    if field.required && value.is_empty() {
        return FieldValidationOutcome::Invalid(ValidationIssue::MissingRequiredField);
    }

    if field.kind == FieldKind::Email && !value.is_empty() && !is_valid_email(value) {
        return FieldValidationOutcome::Invalid(ValidationIssue::MalformedValue {
            kind: FieldKind::Email,
        });
    }

    FieldValidationOutcome::Valid
}

/// Required-field coverage over a snapshot. Errors keep the order of `required`.
pub fn check_required<S: AsRef<str>>(snapshot: &FormSnapshot, required: &[S]) -> ValidationResult {
    let errors: IndexMap<String, String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| snapshot.is_blank(name))
        .map(|name| {
            (
                name.to_string(),
                ValidationIssue::MissingRequiredField.to_string(),
            )
        })
        .collect();

    ValidationResult::from_errors(errors)
}
