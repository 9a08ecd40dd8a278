//! Persistence ports for accounts, courses and logs.
//!
//! Services depend on these traits only; storage engines plug in behind them.
//! Set mutations on enrollment are single atomic operations (add-to-set /
//! pull-from-set) so concurrent enrollments of the same student are idempotent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use coursegate_auth::{Identity, Role};
use coursegate_core::{Course, CourseId, Entity, LogEntry, LogId, SubjectId, Tenant};

pub mod collection;
pub mod in_memory;

pub use collection::InMemoryCollection;
pub use in_memory::{InMemoryCourseRepository, InMemoryLogRepository, InMemoryUserRepository};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("{0} not found")]
    Missing(&'static str),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Stored account: the identity plus its password hash (never the plaintext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub identity: Identity,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for UserRecord {
    type Id = SubjectId;

    fn id(&self) -> &Self::Id {
        &self.identity.subject_id
    }
}

pub trait UserRepository: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] if the subject id or the username
    /// (case-insensitively, across all tenants) is taken.
    fn insert(&self, user: UserRecord) -> Result<(), StoreError>;

    fn find_by_id(&self, id: SubjectId) -> Result<Option<UserRecord>, StoreError>;

    /// Case-insensitive lookup across all tenants.
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Users of `tenant`, optionally restricted to one role, newest first.
    fn list(&self, tenant: Tenant, role: Option<Role>) -> Result<Vec<UserRecord>, StoreError>;

    /// Returns whether a record was removed.
    fn delete(&self, id: SubjectId) -> Result<bool, StoreError>;
}

pub trait CourseRepository: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] if `(name, tenant)` is taken.
    fn insert(&self, course: Course) -> Result<(), StoreError>;

    fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, StoreError>;

    fn list(&self, tenant: Tenant) -> Result<Vec<Course>, StoreError>;

    fn delete(&self, id: CourseId) -> Result<bool, StoreError>;

    /// Atomic add-to-set. `Ok(false)` if the student was already present.
    fn add_student(&self, id: CourseId, student: SubjectId) -> Result<bool, StoreError>;

    /// Atomic pull-from-set. `Ok(false)` if the student was not present.
    fn remove_student(&self, id: CourseId, student: SubjectId) -> Result<bool, StoreError>;
}

pub trait LogRepository: Send + Sync {
    fn insert(&self, log: LogEntry) -> Result<(), StoreError>;

    fn find_by_id(&self, id: LogId) -> Result<Option<LogEntry>, StoreError>;

    /// Entries of one course, oldest first.
    fn list_for_course(&self, course_id: CourseId) -> Result<Vec<LogEntry>, StoreError>;

    fn delete(&self, id: LogId) -> Result<bool, StoreError>;

    /// Returns the number of entries removed.
    fn delete_for_course(&self, course_id: CourseId) -> Result<usize, StoreError>;
}
