use super::validation::FieldViolation;
use crate::storage::StorageError;

// ============================================================================
// Customer Errors
// ============================================================================
//
// Every variant ends the request. HTTP mapping lives in api::errors.
//
// ============================================================================

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const CUSTOMER_NOT_FOUND: &str = "CUSTOMER_NOT_FOUND";
pub const CUSTOMER_EXISTS: &str = "CUSTOMER_EXISTS";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Request failed validation: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Customer with globalId [{0}] does not exist")]
    NotFound(String),

    #[error("Failed to create customer. Email already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage failure: {0}")]
    Storage(StorageError),
}

impl CustomerError {
    /// Stable code returned to clients in the error body.
    pub fn error_code(&self) -> &'static str {
        match self {
            CustomerError::Validation(_) => VALIDATION_ERROR,
            CustomerError::NotFound(_) => CUSTOMER_NOT_FOUND,
            CustomerError::AlreadyExists(_) => CUSTOMER_EXISTS,
            CustomerError::Storage(_) => INTERNAL_ERROR,
        }
    }

    pub fn violations(&self) -> Option<&[FieldViolation]> {
        match self {
            CustomerError::Validation(violations) => Some(violations),
            _ => None,
        }
    }
}

impl From<Vec<FieldViolation>> for CustomerError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        CustomerError::Validation(violations)
    }
}

impl From<StorageError> for CustomerError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::DuplicateEmail(email) => CustomerError::AlreadyExists(email),
            other => CustomerError::Storage(other),
        }
    }
}
