//! ServerBuilder for fluent API to build HTTP servers

use super::router::{RouteGroup, build_resource_routes, join_paths};
use super::routes::RouteTable;
use crate::config::{AppConfig, CorsConfig};
use crate::core::case::to_snake_case;
use crate::core::error::{ConfigError, RequestError};
use crate::core::resource::ResourceController;
use crate::core::response::Reply;
use crate::core::validation::Validator;
use anyhow::Result;
use axum::http::{HeaderValue, Method, Uri, header};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder for creating HTTP servers with resource and group routes
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::from_yaml_file("config.yaml")?;
///
/// ServerBuilder::from_config(config)
///     .resource("/accounts", AccountController::new(repo))
///     .group(RouteGroup::new("/auth", "auth").post("/login", "login", login))
///     .with_health()
///     .with_catch_all()
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    validator: Validator,
    routers: Vec<Router>,
    route_table: RouteTable,
    health: bool,
    catch_all: bool,
    cors: Option<CorsConfig>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self::from_config(AppConfig::default())
    }

    /// Create a builder whose health, catch-all and CORS switches follow `config`
    pub fn from_config(config: AppConfig) -> Self {
        let cors = config.cors.enabled.then(|| config.cors.clone());
        Self {
            health: config.health,
            catch_all: config.catch_all,
            cors,
            config,
            validator: Validator::default(),
            routers: Vec::new(),
            route_table: RouteTable::new(),
        }
    }

    /// Validator used by resources registered after this call
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Mount the CRUD routes of `controller` under `path`
    pub fn resource<C: ResourceController>(mut self, path: &str, controller: C) -> Self {
        let base = join_paths(&[&self.config.url_prefix, path]);
        let (router, routes) = build_resource_routes(
            &base,
            controller,
            self.validator.clone(),
            &self.config.table,
        );
        for route in routes {
            self.route_table.record(route);
        }
        self.routers.push(router);
        self
    }

    /// Mount a named route group under the configured URL prefix
    pub fn group(mut self, group: RouteGroup) -> Self {
        let (router, routes) = group.into_router(&self.config.url_prefix);
        for route in routes {
            self.route_table.record(route);
        }
        self.routers.push(router);
        self
    }

    /// Add custom routes to the server
    ///
    /// Custom routes are merged as-is: they are not prefixed and do not show
    /// up in [`routes`](Self::routes).
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.routers.push(routes);
        self
    }

    /// Mount `GET /health` for uptime monitoring
    pub fn with_health(mut self) -> Self {
        self.health = true;
        self
    }

    /// Answer unmatched routes with a JSON 404 envelope
    pub fn with_catch_all(mut self) -> Self {
        self.catch_all = true;
        self
    }

    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Routes registered so far
    pub fn routes(&self) -> &RouteTable {
        &self.route_table
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let mut app = Router::new();

        if self.health {
            let service = to_snake_case(&self.config.app_name);
            app = app.route("/health", get(move || health_check(service.clone())));
        }

        for router in self.routers {
            app = app.merge(router);
        }

        if self.catch_all {
            app = app.fallback(route_not_found);
        }

        if let Some(cors) = &self.cors {
            app = app.layer(build_cors_layer(cors)?);
        }

        Ok(app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the configured host and port
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_addr();
        let app_name = self.config.app_name.clone();
        let routes = self.route_table.render();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::debug!("Registered routes:\n{}", routes);
        tracing::info!("{} listening on {}", app_name, addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn health_check(service: String) -> Json<Value> {
    Json(json!({
        "message": "OK",
        "service": service,
    }))
}

async fn route_not_found(uri: Uri) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    tracing::debug!(%target, "no route matched");
    Reply::not_found(
        format!("route '{}' not found", target),
        RequestError::RouteNotFound {
            path: uri.path().to_string(),
        },
    )
}

fn build_cors_layer(cors: &CorsConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if cors.allows_any_origin() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| ConfigError::InvalidValue {
                field: "cors.allowed_origins".to_string(),
                value: origin.clone(),
                message: "not a valid header value".to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!("CORS configured with {} allowed origin(s)", origins.len());
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
