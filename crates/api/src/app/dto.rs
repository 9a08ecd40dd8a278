//! Request/response DTOs and their boundary validation.
//!
//! Request bodies deserialize into all-optional structs so a missing field is a
//! `Validation` error with a field-level message rather than a bare 422 from
//! the JSON extractor.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use coursegate_auth::{Identity, Role};
use coursegate_core::{LogEntry, SubjectId, Tenant};
use coursegate_infra::UserRecord;

use crate::app::errors::ServiceError;

/// Unwrap a JSON body, reporting malformed payloads as validation failures.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServiceError::validation(rejection.body_text()))
}

/// Query-string counterpart of [`json_body`].
pub fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ServiceError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ServiceError::validation(rejection.body_text()))
}

fn required(missing: &mut Vec<&'static str>, name: &'static str, value: Option<String>) -> String {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            missing.push(name);
            String::new()
        }
    }
}

fn missing_fields(missing: &[&'static str]) -> ServiceError {
    ServiceError::validation(format!("missing required field(s): {}", missing.join(", ")))
}

// -------------------------
// Auth
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub tenant: Option<String>,
}

/// A registration that passed field-level validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub tenant: Tenant,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ServiceError> {
        let mut missing = Vec::new();
        let username = required(&mut missing, "username", self.username);
        // Passwords are taken verbatim; only presence is checked here.
        let password = match self.password.filter(|p| !p.is_empty()) {
            Some(p) => p,
            None => {
                missing.push("password");
                String::new()
            }
        };
        let role = required(&mut missing, "role", self.role);
        let tenant = required(&mut missing, "tenant", self.tenant);
        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }

        let role = role.parse::<Role>()?;
        let tenant = tenant.parse::<Tenant>()?;
        Ok(Registration {
            username,
            password,
            role,
            tenant,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub tenant: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub tenant: Tenant,
}

impl LoginRequest {
    /// Incomplete credentials or an unknown tenant fail like a wrong password.
    pub fn validate(self) -> Result<Credentials, ServiceError> {
        let username = self.username.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        let password = self.password.filter(|p| !p.is_empty());
        let tenant = self.tenant.and_then(|t| t.parse::<Tenant>().ok());

        match (username, password, tenant) {
            (Some(username), Some(password), Some(tenant)) => Ok(Credentials {
                username,
                password,
                tenant,
            }),
            _ => {
                tracing::debug!(reason = "incomplete credentials", "login rejected");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }
}

/// `{ success, message, user: { id, username, role, tenant }, token }`
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: Identity,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: &'static str,
}

impl SuccessResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

// -------------------------
// Users
// -------------------------

/// Public view of a stored account; the password hash never leaves storage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: SubjectId,
    pub username: String,
    pub role: Role,
    pub tenant: Tenant,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserSummary {
    fn from(record: UserRecord) -> Self {
        let UserRecord {
            identity, created_at, ..
        } = record;
        Self {
            id: identity.subject_id,
            username: identity.username,
            role: identity.role,
            tenant: identity.tenant,
            created_at,
        }
    }
}

// -------------------------
// Courses
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub name: Option<String>,
    pub tenant: Option<String>,
    pub owner_id: Option<u32>,
}

/// Course creation input after validation; `tenant` defaults to the caller's.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub tenant: Option<Tenant>,
    pub owner_id: Option<SubjectId>,
}

impl CreateCourseRequest {
    pub fn validate(self) -> Result<NewCourse, ServiceError> {
        let mut missing = Vec::new();
        let name = required(&mut missing, "name", self.name);
        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }

        let tenant = self
            .tenant
            .map(|t| t.parse::<Tenant>())
            .transpose()?;
        let owner_id = self.owner_id.map(SubjectId::new).transpose()?;
        Ok(NewCourse {
            name,
            tenant,
            owner_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CoursesQuery {
    #[serde(default)]
    pub all: bool,
}

// -------------------------
// Logs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CreateLogRequest {
    pub date: Option<NaiveDate>,
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLog {
    pub date: Option<NaiveDate>,
    pub text: String,
}

impl CreateLogRequest {
    pub fn validate(self) -> Result<NewLog, ServiceError> {
        let mut missing = Vec::new();
        let text = required(&mut missing, "text", self.text);
        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }
        Ok(NewLog {
            date: self.date,
            text,
        })
    }
}

/// A log entry plus its author's username when that lookup succeeded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogView {
    #[serde(flatten)]
    pub entry: LogEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_reports_every_missing_field() {
        let err = RegisterRequest {
            username: Some("  ".into()),
            password: None,
            role: Some("student".into()),
            tenant: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err,
            ServiceError::validation("missing required field(s): username, password, tenant")
        );
    }

    #[test]
    fn register_rejects_unknown_role() {
        let err = RegisterRequest {
            username: Some("s1".into()),
            password: Some("secret1".into()),
            role: Some("janitor".into()),
            tenant: Some("uvu".into()),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn register_parses_role_and_tenant() {
        let reg = RegisterRequest {
            username: Some(" Prof_UVU ".into()),
            password: Some("secret1".into()),
            role: Some("teacher".into()),
            tenant: Some("UVU".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(reg.username, "Prof_UVU");
        assert_eq!(reg.role, Role::Teacher);
        assert_eq!(reg.tenant, Tenant::Uvu);
    }

    #[test]
    fn incomplete_login_is_invalid_credentials() {
        let missing_password = LoginRequest {
            username: Some("s1".into()),
            password: None,
            tenant: Some("uvu".into()),
        };
        let unknown_tenant = LoginRequest {
            username: Some("s1".into()),
            password: Some("password1".into()),
            tenant: Some("byu".into()),
        };
        assert_eq!(missing_password.validate().unwrap_err(), ServiceError::InvalidCredentials);
        assert_eq!(unknown_tenant.validate().unwrap_err(), ServiceError::InvalidCredentials);
    }

    #[test]
    fn login_parses_complete_credentials() {
        let creds = LoginRequest {
            username: Some(" s1 ".into()),
            password: Some("password1".into()),
            tenant: Some("UOFU".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(creds.username, "s1");
        assert_eq!(creds.tenant, Tenant::Uofu);
    }

    #[test]
    fn course_owner_must_be_a_subject_id() {
        let err = CreateCourseRequest {
            name: Some("CS 101".into()),
            tenant: None,
            owner_id: Some(42),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn log_view_flattens_entry() {
        let entry = LogEntry::new(
            coursegate_core::CourseId::new(),
            SubjectId::new(30_000_001).unwrap(),
            Tenant::Uvu,
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            "worked on lab 1",
            Utc::now(),
        )
        .unwrap();
        let view = LogView {
            entry,
            author_username: None,
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["text"], "worked on lab 1");
        assert_eq!(value["authorId"], 30_000_001);
        assert!(value.get("authorUsername").is_none());
    }
}
