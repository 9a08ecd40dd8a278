use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

use coursegate_core::{Course, CourseId, SubjectId};

use crate::app::dto::{self, CoursesQuery, CreateCourseRequest, SuccessResponse};
use crate::app::errors::ServiceError;
use crate::app::routes::parse_id;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<CoursesQuery>, QueryRejection>,
) -> Result<Json<Vec<Course>>, ServiceError> {
    let query = dto::query_params(query)?;
    Ok(Json(services.courses.list(principal.identity(), query.all)?))
}

pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, ServiceError> {
    let course_id: CourseId = parse_id(&course_id)?;
    Ok(Json(services.courses.get(principal.identity(), course_id)?))
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Course>), ServiceError> {
    let input = dto::json_body(payload)?.validate()?;
    let course = services.courses.create(principal.identity(), input)?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn delete_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(course_id): Path<String>,
) -> Result<Json<SuccessResponse>, ServiceError> {
    let course_id: CourseId = parse_id(&course_id)?;
    services.courses.delete(principal.identity(), course_id)?;
    Ok(Json(SuccessResponse::ok("course deleted")))
}

pub async fn enroll(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((course_id, user_id)): Path<(String, String)>,
) -> Result<Json<Course>, ServiceError> {
    let course_id: CourseId = parse_id(&course_id)?;
    let student: SubjectId = parse_id(&user_id)?;
    Ok(Json(services.courses.enroll(principal.identity(), course_id, student)?))
}

pub async fn unenroll(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((course_id, user_id)): Path<(String, String)>,
) -> Result<Json<Course>, ServiceError> {
    let course_id: CourseId = parse_id(&course_id)?;
    let student: SubjectId = parse_id(&user_id)?;
    Ok(Json(services.courses.unenroll(principal.identity(), course_id, student)?))
}
