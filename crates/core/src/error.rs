use thiserror::Error;

/// A value that does not fit the domain model.
///
/// Form validation does not use this type: field errors are collected by the
/// invoice schema. `DomainError` covers parsing single values (ids, statuses)
/// outside a form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid value: {0}")]
    Validation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
