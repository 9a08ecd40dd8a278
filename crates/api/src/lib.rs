//! HTTP API: configuration, resource services, request gate and routing.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
