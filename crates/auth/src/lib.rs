//! `coursegate-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how to
//! issue and verify identity tokens, hash passwords, and decide whether an
//! identity may perform an operation on a course, a log or another account.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;

pub use authorize::{
    Action, AuthzError, CourseScope, LogScope, UserScope, authorize_account_deletion,
    authorize_course_create, authorize_course_delete, authorize_course_read,
    authorize_enrollment, authorize_log_create, authorize_log_delete, authorize_user_lookup,
    authorize_user_read, course_visibility, ensure_same_tenant, log_visibility,
    user_directory_scope,
};
pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use password::{BcryptHasher, PasswordError, PasswordHasher};
pub use principal::Identity;
pub use roles::Role;
pub use token::{TokenError, TokenService, TokenVerifier};
