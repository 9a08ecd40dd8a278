//! HTTP routes, one file per resource.

use core::str::FromStr;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use coursegate_core::DomainError;

use crate::app::errors::ServiceError;

pub mod auth;
pub mod courses;
pub mod logs;
pub mod system;
pub mod users;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
}

/// Endpoints behind the request gate (layered on by `build_router`).
pub fn protected_router() -> Router {
    Router::new()
        .route("/api/auth/validate-token", post(auth::validate_token))
        .route("/api/auth/users/:user_id", delete(auth::delete_account))
        .route("/api/users/:user_id", get(users::get_user))
        .route("/api/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/api/courses/:course_id",
            get(courses::get_course).delete(courses::delete_course),
        )
        .route("/api/courses/:course_id/enroll/:user_id", patch(courses::enroll))
        .route("/api/courses/:course_id/unenroll/:user_id", patch(courses::unenroll))
        .route("/api/logs/:course_id", get(logs::list_logs).post(logs::create_log))
        .route("/api/logs/:course_id/:log_id", delete(logs::delete_log))
}

/// Path segments are parsed here so malformed ids surface as validation errors.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, ServiceError>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(ServiceError::from)
}

/// Run CPU-bound service work (password hashing) off the async workers.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Internal(format!("blocking task failed: {e}")))?
}
