//! Authorization policy for users, courses, enrollment and logs.
//!
//! Every function here is a pure decision over the acting [`Identity`] and the
//! freshly loaded resource state:
//!
//! - No IO
//! - No panics
//! - No caching (re-evaluated on every call)
//!
//! Tenant checks always run first, so a cross-tenant request is reported as
//! [`AuthzError::TenantMismatch`] whatever the role, never as a role or
//! ownership failure that would hint at the resource's contents.

use serde::Serialize;
use thiserror::Error;

use coursegate_core::{Course, LogEntry, SubjectId, Tenant};

use crate::{Identity, Role};

/// Operation being authorized (used in denial reasons and logs).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ListUsers,
    ViewUser,
    DeleteAccount,
    ViewCourse,
    CreateCourse,
    DeleteCourse,
    Enroll,
    Unenroll,
    ReadLogs,
    CreateLog,
    DeleteLog,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ListUsers => "list users",
            Action::ViewUser => "view users",
            Action::DeleteAccount => "delete accounts",
            Action::ViewCourse => "view courses",
            Action::CreateCourse => "create courses",
            Action::DeleteCourse => "delete courses",
            Action::Enroll => "enroll",
            Action::Unenroll => "unenroll",
            Action::ReadLogs => "read logs",
            Action::CreateLog => "create logs",
            Action::DeleteLog => "delete logs",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("role '{role}' may not {action}")]
    RoleNotPermitted { role: Role, action: Action },

    #[error("only the course owner may {0}")]
    NotCourseOwner(Action),

    #[error("must be enrolled in the course to {0}")]
    NotEnrolled(Action),

    /// A student tried to act on another subject's behalf.
    #[error("students may only {0} for themselves")]
    NotSelf(Action),

    #[error("students may only delete logs they authored")]
    NotLogAuthor,

    #[error("teachers may only view students")]
    TargetNotStudent,
}

impl AuthzError {
    /// Impersonation attempts are reported as "forbidden" rather than "unauthorized".
    pub fn is_impersonation(&self) -> bool {
        matches!(self, AuthzError::NotSelf(_))
    }
}

pub fn ensure_same_tenant(identity: &Identity, tenant: Tenant) -> Result<(), AuthzError> {
    if identity.tenant == tenant {
        Ok(())
    } else {
        Err(AuthzError::TenantMismatch)
    }
}

fn deny_role(identity: &Identity, action: Action) -> AuthzError {
    AuthzError::RoleNotPermitted {
        role: identity.role,
        action,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Courses
// ─────────────────────────────────────────────────────────────────────────────

/// Narrowing applied to course listings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CourseScope {
    /// Every course in the tenant.
    Tenant(Tenant),
    OwnedBy { tenant: Tenant, owner: SubjectId },
    EnrolledIn { tenant: Tenant, student: SubjectId },
}

impl CourseScope {
    pub fn tenant(&self) -> Tenant {
        match *self {
            CourseScope::Tenant(t) => t,
            CourseScope::OwnedBy { tenant, .. } => tenant,
            CourseScope::EnrolledIn { tenant, .. } => tenant,
        }
    }

    pub fn admits(&self, course: &Course) -> bool {
        if course.tenant != self.tenant() {
            return false;
        }
        match *self {
            CourseScope::Tenant(_) => true,
            CourseScope::OwnedBy { owner, .. } => course.is_owned_by(owner),
            CourseScope::EnrolledIn { student, .. } => course.is_enrolled(student),
        }
    }
}

/// Which courses `identity` sees in a listing.
///
/// `all` broadens teachers and students to the whole tenant (read-only browsing).
pub fn course_visibility(identity: &Identity, all: bool) -> CourseScope {
    match (identity.role, all) {
        (Role::Admin, _) | (_, true) => CourseScope::Tenant(identity.tenant),
        (Role::Teacher, false) => CourseScope::OwnedBy {
            tenant: identity.tenant,
            owner: identity.subject_id,
        },
        (Role::Student, false) => CourseScope::EnrolledIn {
            tenant: identity.tenant,
            student: identity.subject_id,
        },
    }
}

/// Single-course reads follow the same broadening as `all=true` listings.
pub fn authorize_course_read(identity: &Identity, course: &Course) -> Result<(), AuthzError> {
    ensure_same_tenant(identity, course.tenant)
}

pub fn authorize_course_create(identity: &Identity, declared_tenant: Tenant) -> Result<(), AuthzError> {
    ensure_same_tenant(identity, declared_tenant)?;
    match identity.role {
        Role::Admin | Role::Teacher => Ok(()),
        Role::Student => Err(deny_role(identity, Action::CreateCourse)),
    }
}

pub fn authorize_course_delete(identity: &Identity, course: &Course) -> Result<(), AuthzError> {
    ensure_same_tenant(identity, course.tenant)?;
    match identity.role {
        Role::Admin => Ok(()),
        Role::Teacher if course.is_owned_by(identity.subject_id) => Ok(()),
        Role::Teacher => Err(AuthzError::NotCourseOwner(Action::DeleteCourse)),
        Role::Student => Err(deny_role(identity, Action::DeleteCourse)),
    }
}

/// Enroll/unenroll `target` in `course`.
///
/// Only checks who may act; enrollment state conflicts are the caller's concern.
pub fn authorize_enrollment(
    identity: &Identity,
    course: &Course,
    target: SubjectId,
    action: Action,
) -> Result<(), AuthzError> {
    ensure_same_tenant(identity, course.tenant)?;
    match identity.role {
        Role::Teacher => Ok(()),
        Role::Student if identity.is(target) => Ok(()),
        Role::Student => Err(AuthzError::NotSelf(action)),
        Role::Admin => Err(deny_role(identity, action)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User directory
// ─────────────────────────────────────────────────────────────────────────────

/// Narrowing applied to user listings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UserScope {
    AllIn(Tenant),
    StudentsIn(Tenant),
}

impl UserScope {
    pub fn tenant(&self) -> Tenant {
        match *self {
            UserScope::AllIn(t) | UserScope::StudentsIn(t) => t,
        }
    }

    pub fn admits(&self, user: &Identity) -> bool {
        match *self {
            UserScope::AllIn(t) => user.tenant == t,
            UserScope::StudentsIn(t) => user.tenant == t && user.role == Role::Student,
        }
    }
}

pub fn user_directory_scope(identity: &Identity) -> Result<UserScope, AuthzError> {
    match identity.role {
        Role::Admin => Ok(UserScope::AllIn(identity.tenant)),
        Role::Teacher => Ok(UserScope::StudentsIn(identity.tenant)),
        Role::Student => Err(deny_role(identity, Action::ListUsers)),
    }
}

/// Pre-lookup check: students may only ask for their own record.
pub fn authorize_user_lookup(identity: &Identity, target: SubjectId) -> Result<(), AuthzError> {
    match identity.role {
        Role::Student if !identity.is(target) => Err(AuthzError::NotSelf(Action::ViewUser)),
        _ => Ok(()),
    }
}

/// Post-lookup check on the fetched record.
pub fn authorize_user_read(identity: &Identity, target: &Identity) -> Result<(), AuthzError> {
    ensure_same_tenant(identity, target.tenant)?;
    authorize_user_lookup(identity, target.subject_id)?;
    match identity.role {
        Role::Teacher if target.role != Role::Student && !identity.is(target.subject_id) => {
            Err(AuthzError::TargetNotStudent)
        }
        _ => Ok(()),
    }
}

/// Pre-lookup check: only admins or the account holder may delete an account.
///
/// Admins are additionally tenant-checked against the loaded record via
/// [`ensure_same_tenant`].
pub fn authorize_account_deletion(identity: &Identity, target: SubjectId) -> Result<(), AuthzError> {
    if identity.role == Role::Admin || identity.is(target) {
        Ok(())
    } else {
        Err(deny_role(identity, Action::DeleteAccount))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logs
// ─────────────────────────────────────────────────────────────────────────────

/// Narrowing applied to a course's log listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogScope {
    WholeCourse,
    AuthoredBy(SubjectId),
}

impl LogScope {
    pub fn admits(&self, log: &LogEntry) -> bool {
        match *self {
            LogScope::WholeCourse => true,
            LogScope::AuthoredBy(author) => log.author_id == author,
        }
    }
}

pub fn log_visibility(identity: &Identity, course: &Course) -> Result<LogScope, AuthzError> {
    ensure_same_tenant(identity, course.tenant)?;
    match identity.role {
        Role::Admin => Ok(LogScope::WholeCourse),
        Role::Teacher if course.is_owned_by(identity.subject_id) => Ok(LogScope::WholeCourse),
        Role::Teacher => Err(AuthzError::NotCourseOwner(Action::ReadLogs)),
        Role::Student if course.is_enrolled(identity.subject_id) => {
            Ok(LogScope::AuthoredBy(identity.subject_id))
        }
        Role::Student => Err(AuthzError::NotEnrolled(Action::ReadLogs)),
    }
}

pub fn authorize_log_create(identity: &Identity, course: &Course) -> Result<(), AuthzError> {
    ensure_same_tenant(identity, course.tenant)?;
    match identity.role {
        Role::Admin => Ok(()),
        Role::Teacher if course.is_owned_by(identity.subject_id) => Ok(()),
        Role::Teacher => Err(AuthzError::NotCourseOwner(Action::CreateLog)),
        Role::Student if course.is_enrolled(identity.subject_id) => Ok(()),
        Role::Student => Err(AuthzError::NotEnrolled(Action::CreateLog)),
    }
}

pub fn authorize_log_delete(identity: &Identity, course: &Course, log: &LogEntry) -> Result<(), AuthzError> {
    ensure_same_tenant(identity, course.tenant)?;
    ensure_same_tenant(identity, log.tenant)?;
    match identity.role {
        Role::Admin => Ok(()),
        Role::Teacher if course.is_owned_by(identity.subject_id) => Ok(()),
        Role::Teacher => Err(AuthzError::NotCourseOwner(Action::DeleteLog)),
        Role::Student if log.author_id == identity.subject_id => Ok(()),
        Role::Student => Err(AuthzError::NotLogAuthor),
    }
}
