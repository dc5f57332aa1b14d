//! Table query parameters, normalization and pagination metadata
//!
//! List endpoints read six optional query parameters (`page`, `limit`,
//! `order_by`, `order_dir`, `filter_by`, `search`). Raw values are untrusted:
//! [`QueryParams::normalize`] substitutes endpoint defaults for anything
//! absent or out of range so data-access code always receives a bounded,
//! well-formed set.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;

/// Largest accepted page size
pub const MAX_LIMIT: i64 = 100;

/// Filter value meaning "no filter"
pub const FILTER_ALL: &str = "all";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDir {
    Asc,
    Desc,
}

impl OrderDir {
    /// Parse an exact, lowercase direction
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(OrderDir::Asc),
            "desc" => Some(OrderDir::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDir::Asc => "asc",
            OrderDir::Desc => "desc",
        }
    }
}

impl fmt::Display for OrderDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defaults an endpoint supplies for its table queries
///
/// The defaults are trusted and are not re-checked during normalization;
/// [`TableDefaults::validate`] is run when they come from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDefaults {
    pub page: i64,
    pub limit: i64,
    pub order_by: String,
    pub order_dir: String,
    pub filter_by: String,
    pub search: String,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 25,
            order_by: "id".to_string(),
            order_dir: "desc".to_string(),
            filter_by: String::new(),
            search: String::new(),
        }
    }
}

impl TableDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_order(mut self, order_by: impl Into<String>, order_dir: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self.order_dir = order_dir.into();
        self
    }

    pub fn with_filter(mut self, filter_by: impl Into<String>) -> Self {
        self.filter_by = filter_by.into();
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Check that normalizing with these defaults yields bounded params
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err(format!("page must be at least 1, got {}", self.page));
        }
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.limit
            ));
        }
        if OrderDir::parse(&self.order_dir).is_none() {
            return Err(format!(
                "order_dir must be 'asc' or 'desc', got '{}'",
                self.order_dir
            ));
        }
        Ok(())
    }
}

/// Raw or normalized table query parameters
///
/// `page` and `limit` deserialize leniently: numbers and numeric strings are
/// accepted and anything else reads as 0, which normalization treats as
/// absent.
///
/// # Example
///
/// ```
/// use restkit::core::query::{QueryParams, TableDefaults};
///
/// let mut params: QueryParams =
///     serde_json::from_value(serde_json::json!({"page": "3", "limit": "200"})).unwrap();
/// params.normalize(&TableDefaults::default().with_filter("all"));
///
/// assert_eq!((params.page, params.limit), (3, 25));
/// assert_eq!(params.order_by, "id");
/// assert_eq!(params.offset(), 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    #[serde(deserialize_with = "lenient_int")]
    pub page: i64,

    #[serde(deserialize_with = "lenient_int")]
    pub limit: i64,

    pub order_by: String,

    pub order_dir: String,

    pub filter_by: String,

    pub search: String,
}

impl QueryParams {
    /// Replace a page below 1 and a limit outside [1, 100] with the defaults
    pub fn validate_pagination(&mut self, page: i64, limit: i64) {
        if self.page < 1 {
            self.page = page;
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            self.limit = limit;
        }
    }

    /// Default an empty `order_by` and any direction other than `asc`/`desc`
    pub fn validate_order(&mut self, order_by: &str, order_dir: &str) {
        if self.order_by.is_empty() {
            self.order_by = order_by.to_string();
        }
        if OrderDir::parse(&self.order_dir).is_none() {
            self.order_dir = order_dir.to_string();
        }
    }

    pub fn validate_filter(&mut self, filter_by: &str) {
        if self.filter_by.is_empty() {
            self.filter_by = filter_by.to_string();
        }
    }

    pub fn validate_search(&mut self, search: &str) {
        if self.search.is_empty() {
            self.search = search.to_string();
        }
    }

    /// Run every field's validator against the same defaults
    pub fn normalize(&mut self, defaults: &TableDefaults) {
        self.validate_pagination(defaults.page, defaults.limit);
        self.validate_order(&defaults.order_by, &defaults.order_dir);
        self.validate_filter(&defaults.filter_by);
        self.validate_search(&defaults.search);
    }

    pub fn normalized(mut self, defaults: &TableDefaults) -> Self {
        self.normalize(defaults);
        self
    }

    /// Zero-based row skip derived from the current page and limit
    ///
    /// Saturates instead of overflowing; `page` has no upper bound.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn order_direction(&self) -> Option<OrderDir> {
        OrderDir::parse(&self.order_dir)
    }

    /// Replace `order_by` with `fallback` unless it is in `allowed`
    ///
    /// Not applied by [`normalize`](Self::normalize); endpoints that sort on
    /// a fixed set of columns call it explicitly.
    pub fn restrict_order_by(&mut self, allowed: &[&str], fallback: &str) {
        if !allowed.contains(&self.order_by.as_str()) {
            self.order_by = fallback.to_string();
        }
    }

    /// The `field:value` equality filter, if one is set
    ///
    /// An empty filter and `all` both mean no filter.
    pub fn filter(&self) -> Option<(&str, &str)> {
        if self.filter_by.is_empty() || self.filter_by == FILTER_ALL {
            return None;
        }
        self.filter_by
            .split_once(':')
            .filter(|(field, _)| !field.is_empty())
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientInt;

    impl Visitor<'_> for LenientInt {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(i64::try_from(v).unwrap_or(0))
        }

        fn visit_f64<E: de::Error>(self, _v: f64) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            Ok(v.trim().parse().unwrap_or(0))
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }
    }

    deserializer.deserialize_any(LenientInt)
}

/// Extracts raw [`QueryParams`] from the query string
///
/// Never rejects: a query string that cannot be decoded at all yields
/// all-absent params, which normalization turns into the defaults.
#[derive(Debug, Clone, Default)]
pub struct TableQuery(pub QueryParams);

impl TableQuery {
    pub fn into_inner(self) -> QueryParams {
        self.0
    }
}

impl<S> FromRequestParts<S> for TableQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = match Query::<QueryParams>::try_from_uri(&parts.uri) {
            Ok(Query(params)) => params,
            Err(e) => {
                tracing::debug!(error = %e, "unreadable table query, using defaults");
                QueryParams::default()
            }
        };
        Ok(TableQuery(params))
    }
}

/// Paginated response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,

    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Wrap one page of items read with normalized `params`
    pub fn new(data: Vec<T>, params: &QueryParams, total: usize) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(
                usize::try_from(params.page).unwrap_or(1),
                usize::try_from(params.limit).unwrap_or(1),
                total,
            ),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    pub limit: usize,

    pub offset: usize,

    /// Total number of items (after filters)
    pub total: usize,

    pub total_pages: usize,

    pub has_next: bool,

    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);
        let offset = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            offset,
            total,
            total_pages,
            has_next: offset.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}
