//! Resource controllers: the five CRUD actions behind a URL prefix

use crate::core::error::ApiResult;
use crate::core::query::{QueryParams, TableDefaults};
use crate::core::validation::Validate;
use async_trait::async_trait;
use axum::response::Response;

/// CRUD handlers for one resource
///
/// [`ServerBuilder::resource`](crate::server::ServerBuilder::resource) mounts
/// the actions as:
///
/// | Method | Path          | Action    | Route name          |
/// |--------|---------------|-----------|---------------------|
/// | GET    | `/`           | `index`   | `<prefix>.index`    |
/// | GET    | `/{id}`       | `show`    | `<prefix>.show`     |
/// | POST   | `/`           | `store`   | `<prefix>.store`    |
/// | PATCH  | `/{id}`       | `update`  | `<prefix>.update`   |
/// | DELETE | `/{id}`       | `destroy` | `<prefix>.destroy`  |
///
/// `index` receives query params already normalized against
/// [`table_defaults`](Self::table_defaults). `store` and `update` receive
/// payloads that passed their schema; failures never reach the controller.
#[async_trait]
pub trait ResourceController: Send + Sync + 'static {
    type StoreRequest: Validate + Send + 'static;
    type UpdateRequest: Validate + Send + 'static;

    /// Name prefix for the resource's routes (e.g. "accounts")
    fn prefix(&self) -> &str;

    /// Table query defaults for `index`; `None` uses the server's configured defaults
    fn table_defaults(&self) -> Option<TableDefaults> {
        None
    }

    async fn index(&self, params: QueryParams) -> ApiResult<Response>;

    async fn show(&self, id: String) -> ApiResult<Response>;

    async fn store(&self, request: Self::StoreRequest) -> ApiResult<Response>;

    async fn update(&self, id: String, request: Self::UpdateRequest) -> ApiResult<Response>;

    async fn destroy(&self, id: String) -> ApiResult<Response>;
}
