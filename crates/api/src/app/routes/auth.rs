use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde_json::json;

use coursegate_core::SubjectId;

use crate::app::dto::{self, LoginRequest, RegisterRequest, SessionResponse, SuccessResponse};
use crate::app::errors::ServiceError;
use crate::app::routes::{blocking, parse_id};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let registration = dto::json_body(payload)?.validate()?;
    let session = blocking(move || services.auth.register(registration)).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            success: true,
            message: "registration successful",
            user: session.identity,
            token: session.token,
        }),
    )
        .into_response())
}

/// The token is returned in the body and as an `Authorization` header.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let credentials = dto::json_body(payload)?.validate()?;
    let session = blocking(move || services.auth.login(credentials)).await?;

    let bearer = HeaderValue::from_str(&format!("Bearer {}", session.token))
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    let mut response = Json(SessionResponse {
        success: true,
        message: "login successful",
        user: session.identity,
        token: session.token,
    })
    .into_response();
    response.headers_mut().insert(AUTHORIZATION, bearer);
    Ok(response)
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> Json<SuccessResponse> {
    Json(SuccessResponse::ok("logged out"))
}

pub async fn validate_token(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "user": principal.identity(),
    }))
}

pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse>, ServiceError> {
    let target: SubjectId = parse_id(&user_id)?;
    services.auth.delete_account(principal.identity(), target)?;
    Ok(Json(SuccessResponse::ok("user deleted")))
}
