use thiserror::Error;

/// Integration mistakes caught while wiring a form, never per submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Required field '{field}' is not declared on the form")]
    UnknownRequiredField { field: String },
    #[error("Field '{field}' is declared more than once")]
    DuplicateField { field: String },
    #[error("The form declares no required fields")]
    NoRequiredFields,
    #[error("Event for unknown field '{field}'")]
    UnknownField { field: String },
}
