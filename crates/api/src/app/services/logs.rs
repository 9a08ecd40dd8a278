//! Course-scoped activity logs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use coursegate_auth::{Identity, authorize_log_create, authorize_log_delete, log_visibility};
use coursegate_core::{Course, CourseId, LogEntry, LogId, SubjectId};
use coursegate_infra::{CourseRepository, LogRepository, UserRepository};

use crate::app::dto::{LogView, NewLog};
use crate::app::errors::ServiceError;
use crate::authz::enforce;

pub struct LogService {
    logs: Arc<dyn LogRepository>,
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
}

impl LogService {
    pub fn new(
        logs: Arc<dyn LogRepository>,
        courses: Arc<dyn CourseRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { logs, courses, users }
    }

    /// Logs visible to `identity`, oldest first, with author usernames where resolvable.
    pub fn list(&self, identity: &Identity, course_id: CourseId) -> Result<Vec<LogView>, ServiceError> {
        let course = self.load_course(course_id)?;
        let scope = enforce(identity, log_visibility(identity, &course))?;

        let mut authors: HashMap<SubjectId, Option<String>> = HashMap::new();
        let views = self
            .logs
            .list_for_course(course_id)?
            .into_iter()
            .filter(|log| scope.admits(log))
            .map(|entry| {
                let author_username = authors
                    .entry(entry.author_id)
                    .or_insert_with(|| self.author_username(entry.author_id))
                    .clone();
                LogView {
                    entry,
                    author_username,
                }
            })
            .collect();
        Ok(views)
    }

    /// Author and tenant always come from the acting identity.
    pub fn create(&self, identity: &Identity, course_id: CourseId, input: NewLog) -> Result<LogView, ServiceError> {
        let course = self.load_course(course_id)?;
        enforce(identity, authorize_log_create(identity, &course))?;

        let now = Utc::now();
        let date = input.date.unwrap_or_else(|| now.date_naive());
        let entry = LogEntry::new(course.id, identity.subject_id, course.tenant, date, &input.text, now)?;
        self.logs.insert(entry.clone())?;
        tracing::info!(log_id = %entry.id, course_id = %course.id, author_id = %identity.subject_id, "log created");

        Ok(LogView {
            entry,
            author_username: Some(identity.username.clone()),
        })
    }

    pub fn delete(&self, identity: &Identity, course_id: CourseId, log_id: LogId) -> Result<(), ServiceError> {
        let course = self.load_course(course_id)?;
        let log = self
            .logs
            .find_by_id(log_id)?
            .filter(|l| l.course_id == course.id)
            .ok_or(ServiceError::NotFound("log"))?;
        enforce(identity, authorize_log_delete(identity, &course, &log))?;

        if !self.logs.delete(log_id)? {
            return Err(ServiceError::NotFound("log"));
        }
        tracing::info!(log_id = %log_id, course_id = %course_id, deleted_by = %identity.subject_id, "log deleted");
        Ok(())
    }

    fn load_course(&self, id: CourseId) -> Result<Course, ServiceError> {
        self.courses.find_by_id(id)?.ok_or(ServiceError::NotFound("course"))
    }

    /// Enrichment only: lookup failures degrade to `None`.
    fn author_username(&self, author: SubjectId) -> Option<String> {
        match self.users.find_by_id(author) {
            Ok(record) => record.map(|r| r.identity.username),
            Err(err) => {
                tracing::warn!(author_id = %author, error = %err, "author lookup failed");
                None
            }
        }
    }
}
