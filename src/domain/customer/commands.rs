use serde::{Deserialize, Deserializer};
use validator::Validate;

use super::model::NewCustomer;
use super::validation::{check, not_blank, valid_email, FieldViolation};

// ============================================================================
// Customer Commands - inbound request payloads
// ============================================================================
//
// Every field is optional at the serde level so a missing field reaches the
// validator and is reported as "required" instead of failing JSON parsing.
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    #[validate(
        required(message = "First name is required"),
        custom(function = "not_blank"),
        length(min = 2, max = 50, message = "Length of first name must be between 2 and 50 characters")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last name is required"),
        custom(function = "not_blank"),
        length(min = 2, max = 50, message = "Length of last name must be between 2 and 50 characters")
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        custom(function = "valid_email")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "deserialize_age")]
    #[validate(
        required(message = "Age is required"),
        range(min = 18, message = "Age must be 18 and above")
    )]
    pub age: Option<i32>,

    #[validate(
        required(message = "Address is required"),
        custom(function = "not_blank"),
        length(min = 2, max = 255, message = "Length of address must be between 2 and 255 characters")
    )]
    pub address: Option<String>,
}

impl CreateCustomer {
    /// Run every field rule and, if all pass, attach the global id.
    pub fn validate_into(self, global_id: String) -> Result<NewCustomer, Vec<FieldViolation>> {
        check(&self)?;

        // `required` has passed, so every field is present
        Ok(NewCustomer {
            global_id,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct UpdateAddress {
    #[validate(
        required(message = "Address is required"),
        custom(function = "not_blank"),
        length(min = 2, max = 255, message = "Length of address must be between 2 and 255 characters")
    )]
    pub address: Option<String>,
}

/// Age arrives as a JSON integer, an integral float such as 31.0, or a
/// string holding an integer.
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAge {
        Int(i32),
        Float(f64),
        Str(String),
    }

    match Option::<RawAge>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawAge::Int(age)) => Ok(Some(age)),
        Some(RawAge::Float(age)) => {
            if age.fract() == 0.0 && age >= i32::MIN as f64 && age <= i32::MAX as f64 {
                Ok(Some(age as i32))
            } else {
                Err(serde::de::Error::custom(format!("age is not an integer: {age}")))
            }
        }
        Some(RawAge::Str(raw)) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("age is not an integer: {raw}"))),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> CreateCustomer {
        CreateCustomer {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("jane.doe@example.com".to_string()),
            age: Some(31),
            address: Some("123 street, Amsterdam".to_string()),
        }
    }

    fn violations_for(payload: &CreateCustomer) -> Vec<FieldViolation> {
        check(payload).unwrap_err()
    }

    fn has(violations: &[FieldViolation], field: &str, message: &str) -> bool {
        violations.iter().any(|v| v.field == field && v.message == message)
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(check(&valid_payload()).is_ok());
    }

    #[test]
    fn test_empty_payload_reports_all_five_fields() {
        let violations = violations_for(&CreateCustomer::default());

        assert_eq!(
            violations,
            vec![
                FieldViolation::new("firstName", "First name is required"),
                FieldViolation::new("lastName", "Last name is required"),
                FieldViolation::new("email", "Email is required"),
                FieldViolation::new("age", "Age is required"),
                FieldViolation::new("address", "Address is required"),
            ]
        );
    }

    #[test]
    fn test_empty_payload_from_json() {
        let payload: CreateCustomer = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, CreateCustomer::default());
        assert_eq!(violations_for(&payload).len(), 5);
    }

    #[test]
    fn test_first_name_length_bounds() {
        let message = "Length of first name must be between 2 and 50 characters";
        for name in ["e", "More_than_50_characters_KweWbrUSzcYCkVoVc2FrHFV6L1J"] {
            let payload = CreateCustomer {
                first_name: Some(name.to_string()),
                ..valid_payload()
            };
            let violations = violations_for(&payload);
            assert!(has(&violations, "firstName", message), "{name}: {violations:?}");
        }

        let payload = CreateCustomer {
            first_name: Some("J".repeat(50)),
            ..valid_payload()
        };
        assert!(check(&payload).is_ok());
    }

    #[test]
    fn test_last_name_length_bounds() {
        let payload = CreateCustomer {
            last_name: Some("e".to_string()),
            ..valid_payload()
        };
        let violations = violations_for(&payload);
        assert_eq!(
            violations,
            vec![FieldViolation::new(
                "lastName",
                "Length of last name must be between 2 and 50 characters"
            )]
        );
    }

    #[test]
    fn test_empty_string_is_blank_and_too_short() {
        let payload = CreateCustomer {
            first_name: Some(String::new()),
            ..valid_payload()
        };
        let violations = violations_for(&payload);
        assert_eq!(violations.len(), 2);
        assert!(has(&violations, "firstName", "First name is required"));
        assert!(has(
            &violations,
            "firstName",
            "Length of first name must be between 2 and 50 characters"
        ));
    }

    #[test]
    fn test_whitespace_name_is_blank() {
        let payload = CreateCustomer {
            last_name: Some("    ".to_string()),
            ..valid_payload()
        };
        let violations = violations_for(&payload);
        assert_eq!(violations, vec![FieldViolation::new("lastName", "Last name is required")]);
    }

    #[test]
    fn test_malformed_email() {
        let payload = CreateCustomer {
            email: Some("invalidEmail@".to_string()),
            ..valid_payload()
        };
        assert_eq!(
            violations_for(&payload),
            vec![FieldViolation::new("email", "Email is not valid")]
        );
    }

    #[test]
    fn test_empty_email_only_required() {
        let payload = CreateCustomer {
            email: Some(String::new()),
            ..valid_payload()
        };
        assert_eq!(
            violations_for(&payload),
            vec![FieldViolation::new("email", "Email is required")]
        );
    }

    #[test]
    fn test_age_under_18() {
        let payload = CreateCustomer {
            age: Some(17),
            ..valid_payload()
        };
        assert_eq!(
            violations_for(&payload),
            vec![FieldViolation::new("age", "Age must be 18 and above")]
        );

        let payload = CreateCustomer {
            age: Some(18),
            ..valid_payload()
        };
        assert!(check(&payload).is_ok());
    }

    #[test]
    fn test_age_accepts_numeric_string() {
        let payload: CreateCustomer = serde_json::from_str(r#"{"age": "17"}"#).unwrap();
        assert_eq!(payload.age, Some(17));

        let payload: CreateCustomer = serde_json::from_str(r#"{"age": 42}"#).unwrap();
        assert_eq!(payload.age, Some(42));

        let payload: CreateCustomer = serde_json::from_str(r#"{"age": null}"#).unwrap();
        assert_eq!(payload.age, None);
    }

    #[test]
    fn test_age_rejects_non_numeric() {
        assert!(serde_json::from_str::<CreateCustomer>(r#"{"age": "old"}"#).is_err());
        assert!(serde_json::from_str::<CreateCustomer>(r#"{"age": true}"#).is_err());
    }

    #[test]
    fn test_address_length_bounds() {
        let message = "Length of address must be between 2 and 255 characters";
        for address in ["e".to_string(), "a".repeat(256)] {
            let payload = CreateCustomer {
                address: Some(address),
                ..valid_payload()
            };
            assert!(has(&violations_for(&payload), "address", message));
        }

        let payload = CreateCustomer {
            address: Some("a".repeat(255)),
            ..valid_payload()
        };
        assert!(check(&payload).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 50 two-byte characters
        let payload = CreateCustomer {
            first_name: Some("é".repeat(50)),
            ..valid_payload()
        };
        assert!(check(&payload).is_ok());
    }

    #[test]
    fn test_update_address_rules() {
        assert_eq!(
            check(&UpdateAddress::default()).unwrap_err(),
            vec![FieldViolation::new("address", "Address is required")]
        );

        let short = UpdateAddress {
            address: Some("e".to_string()),
        };
        assert_eq!(
            check(&short).unwrap_err(),
            vec![FieldViolation::new(
                "address",
                "Length of address must be between 2 and 255 characters"
            )]
        );

        let ok = UpdateAddress {
            address: Some("New address".to_string()),
        };
        assert!(check(&ok).is_ok());
    }

    #[test]
    fn test_validate_into_new_customer() {
        let new_customer = valid_payload()
            .validate_into("id-1".to_string())
            .unwrap();
        assert_eq!(new_customer.global_id, "id-1");
        assert_eq!(new_customer.email, "jane.doe@example.com");
        assert_eq!(new_customer.age, 31);

        let violations = CreateCustomer::default()
            .validate_into("id-2".to_string())
            .unwrap_err();
        assert_eq!(violations.len(), 5);
        assert!(violations.iter().all(|v| v.field != "payload"));
    }

    #[test]
    fn test_age_accepts_integral_float() {
        let payload: CreateCustomer = serde_json::from_str(r#"{"age": 31.0}"#).unwrap();
        assert_eq!(payload.age, Some(31));

        assert!(serde_json::from_str::<CreateCustomer>(r#"{"age": 31.5}"#).is_err());
    }

    #[test]
    fn test_blank_short_address_reports_both_rules() {
        let payload = CreateCustomer {
            address: Some(" ".to_string()),
            ..valid_payload()
        };
        let violations = violations_for(&payload);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.field == "address"));
        assert!(has(&violations, "address", "Address is required"));
        assert!(has(
            &violations,
            "address",
            "Length of address must be between 2 and 255 characters"
        ));
    }
}
