use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
};

use coursegate_core::SubjectId;

use crate::app::dto::UserSummary;
use crate::app::errors::ServiceError;
use crate::app::routes::parse_id;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Mounted behind the admin/teacher role gate.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<Vec<UserSummary>>, ServiceError> {
    Ok(Json(services.users.list(principal.identity())?))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
) -> Result<Json<UserSummary>, ServiceError> {
    let target: SubjectId = parse_id(&user_id)?;
    Ok(Json(services.users.get(principal.identity(), target)?))
}
