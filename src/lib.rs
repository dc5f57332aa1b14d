//! # restkit
//!
//! Helpers for building JSON APIs on axum.
//!
//! ## Features
//!
//! - **Declarative validation**: ordered per-field rules, first failure wins,
//!   field-keyed English messages with camelCase field names
//! - **Table queries**: `page`, `limit`, `order_by`, `order_dir`, `filter_by`
//!   and `search` normalized against endpoint defaults, never rejected
//! - **Response envelopes**: success, error and form-error shapes
//! - **Resource routing**: five CRUD routes per controller, named route groups
//!   and a printable route table
//! - **Configuration**: YAML config with defaults for every key
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restkit::prelude::*;
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct AccountStoreRequest {
//!     username: String,
//!     password: String,
//! }
//!
//! impl_validate!(AccountStoreRequest {
//!     username => [required(), min(3), max(16)],
//!     password => [required(), min(8), max(32), password()],
//! });
//!
//! ServerBuilder::from_config(AppConfig::from_yaml_file("config.yaml")?)
//!     .resource("/accounts", AccountController::new(repo))
//!     .with_health()
//!     .with_catch_all()
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        case::{to_camel_case, to_snake_case},
        error::{ApiError, ApiResult, EntityError, RequestError, ValidationError},
        query::{
            OrderDir, PaginatedResponse, PaginationMeta, QueryParams, TableDefaults, TableQuery,
        },
        resource::ResourceController,
        response::{ErrorResponse, FormErrorResponse, Reply, SuccessResponse},
    };

    // === Validation ===
    pub use crate::core::validation::{
        FieldErrors, FieldSpec, Rule, RuleRegistry, Schema, Validate, Validated, Validator,
    };

    // === Macros ===
    pub use crate::impl_validate;

    // === Storage ===
    pub use crate::storage::{Page, Record, Repository, UpdateMap};

    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryRepository;

    // === Config ===
    pub use crate::config::{AppConfig, CorsConfig, LoggingConfig, init_tracing};

    // === Server ===
    pub use crate::server::{RouteGroup, RouteInfo, RouteTable, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::{
        Router,
        response::Response,
        routing::{delete, get, patch, post, put},
    };
}
