//! Server module for building HTTP servers
//!
//! This module provides a `ServerBuilder` that mounts:
//! - CRUD routes for resource controllers
//! - Named route groups
//! - Health and catch-all routes
//!
//! Every mounted route is recorded in a [`RouteTable`] for introspection.

pub mod builder;
pub mod router;
pub mod routes;

pub use builder::ServerBuilder;
pub use router::{RouteGroup, build_resource_routes, join_paths};
pub use routes::{RouteInfo, RouteTable};
