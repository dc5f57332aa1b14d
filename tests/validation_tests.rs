//! Integration tests for the declarative validator
//!
//! These tests verify that:
//! - Valid payloads populate the target unchanged
//! - Each failing field reports exactly one message, from its first failing rule
//! - Error bags are keyed by wire name while messages use camelCase names
//! - Undecodable payloads are reported under the sentinel key

use restkit::core::validation::{DECODE_ERROR_KEY, PASSWORD_MESSAGE, RuleRegistry, SchemaError};
use restkit::prelude::*;
use serde_json::json;

// =============================================================================
// Test Requests
// =============================================================================

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct AccountStoreRequest {
    username: String,
    password: String,
}

impl_validate!(AccountStoreRequest {
    username => [required(), min(3), max(16)],
    password => [required(), min(8), max(32)],
});

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StrongPasswordRequest {
    password: String,
}

impl_validate!(StrongPasswordRequest {
    password => [required(), min(8), max(32), password()],
});

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ProfileRequest {
    #[serde(rename = "first_name")]
    first: String,
    account_ref: String,
    website: String,
    #[serde(skip)]
    internal_note: String,
}

impl_validate!(ProfileRequest {
    first as "first_name" => [required(), max(32)],
    account_ref => [required(), starts_with("acc_")],
    website => [omit_empty(), url()],
    internal_note as "-" => [required()],
});

fn validator() -> Validator {
    Validator::default()
}

// =============================================================================
// Success Path
// =============================================================================

mod success_tests {
    use super::*;

    #[test]
    fn test_valid_payload_populates_target_exactly() {
        let request: AccountStoreRequest = validator()
            .validate(json!({"username": "admin", "password": "asfsafasff"}))
            .unwrap();
        assert_eq!(
            request,
            AccountStoreRequest {
                username: "admin".to_string(),
                password: "asfsafasff".to_string(),
            }
        );
    }

    #[test]
    fn test_skipped_wire_name_never_reported() {
        let result = validator().validate::<ProfileRequest>(json!({
            "first_name": "Ada",
            "account_ref": "acc_42",
        }));
        assert!(result.is_ok());
    }

    #[test]
    fn test_optional_field_checked_only_when_present() {
        let err = validator()
            .validate::<ProfileRequest>(json!({
                "first_name": "Ada",
                "account_ref": "acc_42",
                "website": "not a url",
            }))
            .unwrap_err();
        assert_eq!(err.errors().fields(), vec!["website"]);
    }
}

// =============================================================================
// Field Errors
// =============================================================================

mod field_error_tests {
    use super::*;

    #[test]
    fn test_short_username_only() {
        let err = validator()
            .validate::<AccountStoreRequest>(json!({"username": "ad", "password": "asfsafasff"}))
            .unwrap_err();
        let errors = err.errors();
        assert_eq!(errors.fields(), vec!["username"]);
        assert_eq!(
            errors.get("username"),
            Some("username must be at least 3 characters")
        );
    }

    #[test]
    fn test_missing_required_field_reports_only_that_field() {
        let err = validator()
            .validate::<AccountStoreRequest>(json!({"password": "asfsafasff"}))
            .unwrap_err();
        let errors = err.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("username"), Some("username is a required field"));
    }

    #[test]
    fn test_first_declared_rule_wins() {
        let err = validator()
            .validate::<AccountStoreRequest>(json!({"username": "", "password": "asfsafasff"}))
            .unwrap_err();
        assert_eq!(
            err.errors().get("username"),
            Some("username is a required field")
        );
    }

    #[test]
    fn test_every_failing_field_collected() {
        let err = validator()
            .validate::<AccountStoreRequest>(json!({"username": "a".repeat(17), "password": "short"}))
            .unwrap_err();
        let errors = err.errors();
        assert!(errors.contains_all(&["username", "password"]));
        assert_eq!(
            errors.get("username"),
            Some("username must be a maximum of 16 characters")
        );
    }

    #[test]
    fn test_messages_deterministic_across_runs() {
        let payload = json!({"username": "", "password": "x"});
        let first = validator()
            .validate::<AccountStoreRequest>(payload.clone())
            .unwrap_err();
        for _ in 0..10 {
            let again = validator()
                .validate::<AccountStoreRequest>(payload.clone())
                .unwrap_err();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_wire_key_with_camel_case_message() {
        let err = validator()
            .validate::<ProfileRequest>(json!({"account_ref": "x_1"}))
            .unwrap_err();
        let errors = err.errors();
        assert_eq!(
            errors.get("first_name"),
            Some("firstName is a required field")
        );
        assert_eq!(
            errors.get("account_ref"),
            Some("accountRef must start with 'acc_'")
        );
        assert!(!errors.contains("firstName"));
    }
}

// =============================================================================
// Password Strength
// =============================================================================

mod password_tests {
    use super::*;

    fn password_error(password: &str) -> Option<String> {
        validator()
            .validate::<StrongPasswordRequest>(json!({ "password": password }))
            .err()
            .and_then(|e| e.errors().get("password").map(str::to_string))
    }

    #[test]
    fn test_lowercase_with_digits_fails() {
        assert_eq!(
            password_error("alllowercase123").as_deref(),
            Some(PASSWORD_MESSAGE)
        );
    }

    #[test]
    fn test_uppercase_without_digits_fails() {
        assert_eq!(password_error("NoDigitsHere").as_deref(), Some(PASSWORD_MESSAGE));
    }

    #[test]
    fn test_strong_password_passes() {
        assert_eq!(password_error("Valid123"), None);
    }

    #[test]
    fn test_length_checked_before_strength() {
        assert_eq!(
            password_error("V1").as_deref(),
            Some("password must be at least 8 characters")
        );
    }
}

// =============================================================================
// Decode Errors
// =============================================================================

mod decode_tests {
    use super::*;

    #[test]
    fn test_malformed_json_uses_sentinel() {
        let err = validator()
            .validate_json::<AccountStoreRequest>(br#"{"username": "ad""#)
            .unwrap_err();
        let errors = err.errors();
        assert_eq!(errors.fields(), vec![DECODE_ERROR_KEY]);
    }

    #[test]
    fn test_wrong_shape_short_circuits_rules() {
        let err = validator()
            .validate::<AccountStoreRequest>(json!({"username": ["not", "a", "string"]}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Decode { .. }));
        assert!(!err.errors().contains("password"));
    }

    #[test]
    fn test_serialized_bag_shape() {
        let err = validator()
            .validate::<AccountStoreRequest>(json!({"username": "ad", "password": "asfsafasff"}))
            .unwrap_err();
        assert_eq!(
            serde_json::to_value(err.errors()).unwrap(),
            json!({"username": "username must be at least 3 characters"})
        );
    }
}

// =============================================================================
// Registries and Tag Schemas
// =============================================================================

mod registry_tests {
    use super::*;

    #[test]
    fn test_custom_rule_and_message_override() {
        let registry = RuleRegistry::builder()
            .register_rule("no_spaces", "{0} cannot contain spaces", |value, _| {
                value.as_str().is_some_and(|s| !s.contains(' '))
            })
            .override_message("required", "{0} cannot be blank")
            .build();
        let validator = Validator::new(registry);

        let schema = Schema::new()
            .field(FieldSpec::new("slug", "page_slug", [Rule::required(), Rule::custom("no_spaces")]));

        let errors = validator.evaluate(&schema, &json!({"page_slug": "two words"}));
        assert_eq!(errors.get("page_slug"), Some("pageSlug cannot contain spaces"));

        let errors = validator.evaluate(&schema, &json!({}));
        assert_eq!(errors.get("page_slug"), Some("pageSlug cannot be blank"));
    }

    #[test]
    fn test_schema_from_tags_matches_macro() {
        let registry = RuleRegistry::default();
        let schema = Schema::from_tags(
            &registry,
            &[
                ("username", "username", "required,min=3,max=16"),
                ("password", "password", "required,min=8,max=32"),
            ],
        )
        .unwrap();
        assert_eq!(schema, AccountStoreRequest::schema());
    }

    #[test]
    fn test_schema_from_tags_rejects_unregistered_rule() {
        let err = Schema::from_tags(
            &RuleRegistry::default(),
            &[("code", "code", "required,sparkly")],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownRule { .. }));
    }
}
