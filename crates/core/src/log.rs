//! Activity log entries attached to a course.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{CourseId, DomainError, DomainResult, Entity, LogId, SubjectId, Tenant};

/// A dated note attributed to one person within one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: LogId,
    pub course_id: CourseId,
    pub author_id: SubjectId,
    pub tenant: Tenant,
    pub date: NaiveDate,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(
        course_id: CourseId,
        author_id: SubjectId,
        tenant: Tenant,
        date: NaiveDate,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("log text must not be empty"));
        }

        Ok(Self {
            id: LogId::new(),
            course_id,
            author_id,
            tenant,
            date,
            text: text.to_string(),
            created_at,
        })
    }
}

impl Entity for LogEntry {
    type Id = LogId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
