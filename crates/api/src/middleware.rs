//! Request gate: bearer-token authentication and role allow-lists.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use coursegate_auth::{Role, TokenVerifier};

use crate::app::errors::ServiceError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Verify the bearer token and attach the identity it carries.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = extract_bearer(req.headers()).ok_or(ServiceError::Unauthenticated)?;

    let identity = state.tokens.verify_at(token, Utc::now()).map_err(|err| {
        tracing::debug!(error = %err, path = %req.uri().path(), "token rejected");
        ServiceError::Unauthenticated
    })?;

    req.extensions_mut().insert(PrincipalContext::new(identity));
    Ok(next.run(req).await)
}

pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Fixed allow-list of roles for a group of routes.
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    pub allowed: &'static [Role],
}

/// Must run after [`auth_middleware`].
///
/// A role outside the list is reported as `Unauthorized`, the same code the
/// policy layer uses for role denials.
pub async fn require_roles(
    State(gate): State<RoleGate>,
    req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let principal = req
        .extensions()
        .get::<PrincipalContext>()
        .ok_or(ServiceError::Unauthenticated)?;

    if !gate.allowed.contains(&principal.role()) {
        tracing::warn!(
            subject_id = %principal.subject_id(),
            role = %principal.role(),
            tenant = %principal.tenant(),
            path = %req.uri().path(),
            "role not permitted"
        );
        return Err(ServiceError::Unauthorized(format!(
            "role '{}' may not access this resource",
            principal.role()
        )));
    }
    Ok(next.run(req).await)
}
