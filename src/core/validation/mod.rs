//! Declarative request validation
//!
//! Request types declare an ordered [`Schema`] of fields and rules. The
//! [`Validator`] populates a target from the payload, evaluates every field
//! and collects at most one translated message per failing field into a
//! [`FieldErrors`] bag. The [`Validated`] extractor wires this into axum
//! handlers.

pub mod extractor;
pub mod field_errors;
pub mod macros;
pub mod registry;
pub mod rule;
pub mod schema;
pub mod validator;

pub use extractor::Validated;
pub use field_errors::{DECODE_ERROR_KEY, FieldErrors};
pub use registry::{
    PASSWORD_MESSAGE, PASSWORD_RULE, RuleCheck, RuleRegistry, RuleRegistryBuilder,
    is_strong_password, parse_rules,
};
pub use rule::{Rule, SchemaError};
pub use schema::{FieldSpec, SKIP_WIRE_NAME, Schema, Validate};
pub use validator::Validator;
