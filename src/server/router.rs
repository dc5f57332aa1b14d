//! Route builders for resources and named route groups

use super::routes::RouteInfo;
use crate::core::error::ApiResult;
use crate::core::query::{TableDefaults, TableQuery};
use crate::core::resource::ResourceController;
use crate::core::validation::{Validated, Validator};
use axum::extract::{FromRef, Path, State};
use axum::handler::Handler;
use axum::http::Method;
use axum::response::Response;
use axum::routing::{MethodRouter, delete, get, patch, post, put};
use axum::Router;
use std::sync::Arc;

/// Join URL segments into a single absolute path without duplicate slashes
///
/// ```
/// use restkit::server::router::join_paths;
///
/// assert_eq!(join_paths(&["/api/", "/accounts", "/"]), "/api/accounts");
/// assert_eq!(join_paths(&["/", "/"]), "/");
/// ```
pub fn join_paths(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// Router state shared by a resource's handlers
pub struct ResourceState<C> {
    controller: Arc<C>,
    validator: Validator,
    defaults: TableDefaults,
}

impl<C> Clone for ResourceState<C> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            validator: self.validator.clone(),
            defaults: self.defaults.clone(),
        }
    }
}

impl<C> FromRef<ResourceState<C>> for Validator {
    fn from_ref(state: &ResourceState<C>) -> Self {
        state.validator.clone()
    }
}

async fn index<C: ResourceController>(
    State(state): State<ResourceState<C>>,
    TableQuery(params): TableQuery,
) -> ApiResult<Response> {
    let params = params.normalized(&state.defaults);
    state.controller.index(params).await
}

async fn show<C: ResourceController>(
    State(state): State<ResourceState<C>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    state.controller.show(id).await
}

async fn store<C: ResourceController>(
    State(state): State<ResourceState<C>>,
    Validated(request): Validated<C::StoreRequest>,
) -> ApiResult<Response> {
    state.controller.store(request).await
}

async fn update<C: ResourceController>(
    State(state): State<ResourceState<C>>,
    Path(id): Path<String>,
    Validated(request): Validated<C::UpdateRequest>,
) -> ApiResult<Response> {
    state.controller.update(id, request).await
}

async fn destroy<C: ResourceController>(
    State(state): State<ResourceState<C>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    state.controller.destroy(id).await
}

/// Mount the five CRUD actions of `controller` under `base`
///
/// Returns the router and the routes it registered. `fallback_defaults` is
/// used for `index` when the controller supplies no table defaults.
pub fn build_resource_routes<C: ResourceController>(
    base: &str,
    controller: C,
    validator: Validator,
    fallback_defaults: &TableDefaults,
) -> (Router, Vec<RouteInfo>) {
    let collection = join_paths(&[base]);
    let member = join_paths(&[base, "{id}"]);
    let prefix = controller.prefix().to_string();

    let state = ResourceState {
        defaults: controller
            .table_defaults()
            .unwrap_or_else(|| fallback_defaults.clone()),
        controller: Arc::new(controller),
        validator,
    };

    let router = Router::new()
        .route(&collection, get(index::<C>).post(store::<C>))
        .route(
            &member,
            get(show::<C>).patch(update::<C>).delete(destroy::<C>),
        )
        .with_state(state);

    let routes = vec![
        RouteInfo::new(&Method::GET, &collection, format!("{}.index", prefix)),
        RouteInfo::new(&Method::GET, &member, format!("{}.show", prefix)),
        RouteInfo::new(&Method::POST, &collection, format!("{}.store", prefix)),
        RouteInfo::new(&Method::PATCH, &member, format!("{}.update", prefix)),
        RouteInfo::new(&Method::DELETE, &member, format!("{}.destroy", prefix)),
    ];

    (router, routes)
}

struct GroupRoute {
    method: Method,
    path: String,
    name: String,
    handler: MethodRouter,
}

/// Routes sharing a URL prefix and a route-name prefix
///
/// # Example
///
/// ```rust,ignore
/// let auth = RouteGroup::new("/auth", "auth")
///     .post("/login", "login", login)
///     .post("/logout", "logout", logout);
///
/// ServerBuilder::from_config(config).group(auth);
/// // POST /auth/login is named "auth.login"
/// ```
pub struct RouteGroup {
    url_prefix: String,
    name_prefix: String,
    routes: Vec<GroupRoute>,
}

impl RouteGroup {
    pub fn new(url_prefix: impl Into<String>, name_prefix: impl Into<String>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            name_prefix: name_prefix.into(),
            routes: Vec::new(),
        }
    }

    pub fn get<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::GET, path, name, get(handler))
    }

    pub fn post<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::POST, path, name, post(handler))
    }

    pub fn put<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::PUT, path, name, put(handler))
    }

    pub fn patch<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::PATCH, path, name, patch(handler))
    }

    pub fn delete<H, T>(self, path: &str, name: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::DELETE, path, name, delete(handler))
    }

    fn add(mut self, method: Method, path: &str, name: &str, handler: MethodRouter) -> Self {
        self.routes.push(GroupRoute {
            method,
            path: path.to_string(),
            name: name.to_string(),
            handler,
        });
        self
    }

    /// Qualified route name: `<name_prefix>.<name>`, or `name` without a prefix
    pub fn qualified_name(&self, name: &str) -> String {
        if self.name_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.name_prefix, name)
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Mount every route under `base` followed by the group's URL prefix
    pub fn into_router(self, base: &str) -> (Router, Vec<RouteInfo>) {
        let mut router = Router::new();
        let mut infos = Vec::with_capacity(self.routes.len());

        for route in &self.routes {
            let path = join_paths(&[base, &self.url_prefix, &route.path]);
            infos.push(RouteInfo::new(&route.method, &path, self.qualified_name(&route.name)));
        }

        for (route, info) in self.routes.into_iter().zip(&infos) {
            router = router.route(&info.path, route.handler);
        }

        (router, infos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths(&[]), "/");
        assert_eq!(join_paths(&["/"]), "/");
        assert_eq!(join_paths(&["api", "v1/", "/users"]), "/api/v1/users");
        assert_eq!(join_paths(&["/", "accounts", "{id}"]), "/accounts/{id}");
    }

    #[test]
    fn test_group_names_and_paths() {
        let group = RouteGroup::new("/auth", "auth")
            .post("/login", "login", || async { "ok" })
            .get("/me", "me", || async { "me" });
        assert_eq!(group.len(), 2);

        let (_, infos) = group.into_router("/api");
        assert_eq!(infos[0], RouteInfo::new(&Method::POST, "/api/auth/login", "auth.login"));
        assert_eq!(infos[1], RouteInfo::new(&Method::GET, "/api/auth/me", "auth.me"));
    }

    #[test]
    fn test_group_without_name_prefix() {
        let group = RouteGroup::new("/", "");
        assert_eq!(group.qualified_name("ping"), "ping");
    }
}
