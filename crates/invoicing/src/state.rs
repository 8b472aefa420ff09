use serde::{Deserialize, Serialize};

use crate::schema::FieldErrors;

/// Data handed back to a form after an action declines to navigate.
///
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default)]
    pub errors: FieldErrors,
    #[serde(default)]
    pub message: Option<String>,
}

impl FormState {
    /// Validation failure: field messages plus a summary line.
    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors,
            message: Some(message.into()),
        }
    }

    /// A summary message with no field errors.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors::default(),
            message: Some(message.into()),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
