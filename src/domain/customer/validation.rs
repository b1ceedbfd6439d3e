use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

// ============================================================================
// Payload Validation
// ============================================================================
//
// Field rules are declared on the payload structs with #[derive(Validate)].
// This module holds the custom checks those derives call and flattens
// validator's error map into the (field, message) list the API returns.
//
// Every rule runs independently, so one request can report several
// violations, including two for the same field ("" is blank AND too short).
//
// ============================================================================

/// Error code shared by the `required` derive rule and the blank check.
pub const CODE_REQUIRED: &str = "required";
pub const CODE_EMAIL: &str = "email";

/// A single rule violation on one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Wire name and "required" message for each validated payload field,
/// in the order violations are reported.
const FIELDS: &[(&str, &str, &str)] = &[
    ("first_name", "firstName", "First name is required"),
    ("last_name", "lastName", "Last name is required"),
    ("email", "email", "Email is required"),
    ("age", "age", "Age is required"),
    ("address", "address", "Address is required"),
];

/// Present values must contain something other than whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(CODE_REQUIRED));
    }
    Ok(())
}

/// Blank emails are reported as missing, anything else must parse as an email.
pub fn valid_email(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new(CODE_EMAIL).with_message(Cow::Borrowed("Email is not valid")))
}

/// Run the payload's rules and return every violation found.
pub fn check<T: Validate>(payload: &T) -> Result<(), Vec<FieldViolation>> {
    match payload.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(flatten(&errors)),
    }
}

fn flatten(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<(usize, FieldViolation)> = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        let field: &str = field.as_ref();
        let (position, wire_name, required_message) = FIELDS
            .iter()
            .enumerate()
            .find(|(_, (name, _, _))| *name == field)
            .map(|(i, (_, wire, required))| (i, *wire, *required))
            .unwrap_or((FIELDS.len(), field, "Field is invalid"));

        for error in field_errors.iter() {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None if error.code == CODE_REQUIRED => required_message.to_string(),
                None => format!("{} is invalid", wire_name),
            };
            violations.push((position, FieldViolation::new(wire_name, message)));
        }
    }

    // Fields come out in FIELDS order; within a field, validator's report order is kept
    violations.sort_by_key(|(position, _)| *position);
    violations.into_iter().map(|(_, violation)| violation).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Jane").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
    }

    #[test]
    fn test_valid_email() {
        assert!(valid_email("jane.doe@example.com").is_ok());
        assert!(valid_email("invalidEmail@").is_err());
        assert!(valid_email("no-at-sign").is_err());
    }

    #[test]
    fn test_blank_email_is_required_not_invalid() {
        let err = valid_email("  ").unwrap_err();
        assert_eq!(err.code, CODE_REQUIRED);
        assert!(err.message.is_none());
    }

    #[test]
    fn test_email_error_carries_message() {
        let err = valid_email("invalidEmail@").unwrap_err();
        assert_eq!(err.code, CODE_EMAIL);
        assert_eq!(err.message.as_deref(), Some("Email is not valid"));
    }
}
