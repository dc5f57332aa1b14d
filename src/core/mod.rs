//! Core module containing the request-shaping pipeline and shared types

pub mod case;
pub mod error;
pub mod query;
pub mod resource;
pub mod response;
pub mod validation;

pub use case::{to_camel_case, to_snake_case};
pub use error::{ApiError, ApiResult, ValidationError};
pub use query::{OrderDir, PaginatedResponse, PaginationMeta, QueryParams, TableDefaults, TableQuery};
pub use resource::ResourceController;
pub use response::{ErrorResponse, FormErrorResponse, Reply, SuccessResponse};
pub use validation::{FieldErrors, Rule, RuleRegistry, Schema, Validate, Validated, Validator};
