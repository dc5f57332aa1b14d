//! Payload population and schema evaluation

use super::field_errors::FieldErrors;
use super::registry::{RuleRegistry, is_zero};
use super::rule::Rule;
use super::schema::{Schema, Validate};
use crate::core::error::ValidationError;
use serde_json::Value;
use std::sync::Arc;

/// Populates request types from payloads and checks them against their schema
///
/// Cloning is cheap; the rule registry is shared and never mutated after
/// construction, so a single validator can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
}

impl Validator {
    pub fn new(registry: RuleRegistry) -> Self {
        Self::from_arc(Arc::new(registry))
    }

    pub fn from_arc(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Populate `T` from a decoded payload, then check it
    ///
    /// A payload that does not fit `T` yields [`ValidationError::Decode`];
    /// rule failures yield [`ValidationError::Fields`] with one entry per
    /// failing field.
    pub fn validate<T: Validate>(&self, payload: Value) -> Result<T, ValidationError> {
        let target: T = serde_json::from_value(payload).map_err(ValidationError::decode)?;
        self.check(&target)?;
        Ok(target)
    }

    /// Populate `T` from a raw JSON body, then check it
    pub fn validate_json<T: Validate>(&self, body: &[u8]) -> Result<T, ValidationError> {
        let target: T = serde_json::from_slice(body).map_err(ValidationError::decode)?;
        self.check(&target)?;
        Ok(target)
    }

    /// Check an already populated target
    pub fn check<T: Validate>(&self, target: &T) -> Result<(), ValidationError> {
        let value = serde_json::to_value(target).map_err(ValidationError::decode)?;
        let errors = self.evaluate(&T::schema(), &value);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(errors))
        }
    }

    /// Run every field of `schema` against `value`
    ///
    /// Each field reports at most one message: its first failing rule. A
    /// field whose value is absent is evaluated as null.
    pub fn evaluate(&self, schema: &Schema, value: &Value) -> FieldErrors {
        let mut errors = FieldErrors::new();

        for spec in schema.fields() {
            if spec.is_skipped() {
                continue;
            }

            let field_value = value.get(&spec.wire_name).unwrap_or(&Value::Null);
            for rule in &spec.rules {
                if *rule == Rule::OmitEmpty {
                    if is_zero(field_value) {
                        break;
                    }
                    continue;
                }

                if let Some(message) = self.registry.evaluate(rule, &spec.wire_name, field_value) {
                    errors.insert(spec.wire_name.clone(), message);
                    break;
                }
            }
        }

        errors
    }
}
