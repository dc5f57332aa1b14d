//! Registered route introspection

use axum::http::Method;
use serde::Serialize;

/// A mounted route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
    pub name: String,
}

impl RouteInfo {
    pub fn new(method: &Method, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            method: method.as_str().to_string(),
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Every route mounted through the server builder
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteInfo>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, route: RouteInfo) {
        tracing::debug!(method = %route.method, path = %route.path, name = %route.name, "route registered");
        self.routes.push(route);
    }

    /// Routes sorted by path, then method
    pub fn routes(&self) -> Vec<&RouteInfo> {
        let mut sorted: Vec<&RouteInfo> = self.routes.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
        sorted
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RouteInfo> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes
            .iter()
            .any(|r| r.method == method.as_str() && r.path == path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Plain-text table of the routes, one per line, columns aligned
    ///
    /// ```text
    /// method | path           | name
    /// ------ | ----           | ----
    /// GET    | /accounts      | accounts.index
    /// ```
    pub fn render(&self) -> String {
        let routes = self.routes();
        let method_width = column_width("method", routes.iter().map(|r| r.method.as_str()));
        let path_width = column_width("path", routes.iter().map(|r| r.path.as_str()));

        let mut out = String::new();
        push_row(&mut out, method_width, path_width, "method", "path", "name");
        push_row(&mut out, method_width, path_width, "------", "----", "----");
        for route in routes {
            push_row(
                &mut out,
                method_width,
                path_width,
                &route.method,
                &route.path,
                &route.name,
            );
        }
        out
    }
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(str::len).chain([header.len()]).max().unwrap_or(0)
}

fn push_row(out: &mut String, method_width: usize, path_width: usize, method: &str, path: &str, name: &str) {
    let line = format!(
        "{:<mw$} | {:<pw$} | {}",
        method,
        path,
        name,
        mw = method_width,
        pw = path_width
    );
    out.push_str(line.trim_end());
    out.push('\n');
}
