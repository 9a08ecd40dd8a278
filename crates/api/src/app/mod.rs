//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services/`: resource services over the persistence ports
//! - `routes/`: HTTP handlers, one file per resource
//! - `dto.rs`: request/response DTOs and boundary validation
//! - `errors.rs`: the service error taxonomy and its JSON responses

use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use coursegate_auth::{BcryptHasher, Role, TokenService, TokenVerifier};

use crate::config::ApiConfig;
use crate::middleware::{self, AuthState, RoleGate};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::{AppServices, Repositories};

/// Roles allowed to browse the user directory.
const DIRECTORY_ROLES: &[Role] = &[Role::Admin, Role::Teacher];

/// Build the full HTTP router from configuration (public entrypoint used by `main.rs`).
///
/// Seeds the configured admin accounts before returning.
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let tokens = Arc::new(TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl));
    let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost));
    let services = Arc::new(AppServices::new(
        Repositories::in_memory(),
        tokens.clone(),
        hasher,
        config.min_password_len,
    ));

    seed_admins(&services, config).await?;

    Ok(build_router(services, tokens))
}

/// Assemble routes around already-built services.
pub fn build_router(services: Arc<AppServices>, tokens: Arc<dyn TokenVerifier>) -> Router {
    let auth_state = AuthState { tokens };

    let directory = Router::new()
        .route("/api/users", get(routes::users::list_users))
        .route_layer(axum::middleware::from_fn_with_state(
            RoleGate {
                allowed: DIRECTORY_ROLES,
            },
            middleware::require_roles,
        ));

    // Protected routes: require a verified identity.
    let protected = routes::protected_router()
        .merge(directory)
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    routes::public_router()
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}

async fn seed_admins(services: &Arc<AppServices>, config: &ApiConfig) -> anyhow::Result<()> {
    for seed in config.seed_admins.iter().cloned() {
        let services = services.clone();
        let username = seed.username.clone();
        routes::blocking(move || services.auth.ensure_admin(&seed.username, &seed.password, seed.tenant))
            .await
            .with_context(|| format!("failed to seed admin account '{username}'"))?;
    }
    Ok(())
}
