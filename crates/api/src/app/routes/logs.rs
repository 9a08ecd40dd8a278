use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
};

use coursegate_core::{CourseId, LogId};

use crate::app::dto::{self, CreateLogRequest, LogView, SuccessResponse};
use crate::app::errors::ServiceError;
use crate::app::routes::parse_id;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn list_logs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<LogView>>, ServiceError> {
    let course_id: CourseId = parse_id(&course_id)?;
    Ok(Json(services.logs.list(principal.identity(), course_id)?))
}

pub async fn create_log(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(course_id): Path<String>,
    payload: Result<Json<CreateLogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LogView>), ServiceError> {
    let course_id: CourseId = parse_id(&course_id)?;
    let input = dto::json_body(payload)?.validate()?;
    let log = services.logs.create(principal.identity(), course_id, input)?;
    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn delete_log(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((course_id, log_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, ServiceError> {
    let course_id: CourseId = parse_id(&course_id)?;
    let log_id: LogId = parse_id(&log_id)?;
    services.logs.delete(principal.identity(), course_id, log_id)?;
    Ok(Json(SuccessResponse::ok("log deleted")))
}
