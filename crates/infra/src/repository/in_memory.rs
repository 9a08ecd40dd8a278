//! In-memory adapters for the persistence ports (tests/dev).

use std::collections::hash_map::Entry;

use coursegate_auth::Role;
use coursegate_core::{Course, CourseId, LogEntry, LogId, SubjectId, Tenant};

use super::{
    CourseRepository, InMemoryCollection, LogRepository, StoreError, UserRecord, UserRepository,
};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: InMemoryCollection<UserRecord>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn insert(&self, user: UserRecord) -> Result<(), StoreError> {
        self.users.write(|map| {
            let username = &user.identity.username;
            if map
                .values()
                .any(|u| u.identity.username.eq_ignore_ascii_case(username))
            {
                return Err(StoreError::Duplicate(format!("username '{username}'")));
            }
            match map.entry(user.identity.subject_id) {
                Entry::Occupied(e) => Err(StoreError::Duplicate(format!("subject id {}", e.key()))),
                Entry::Vacant(e) => {
                    e.insert(user);
                    Ok(())
                }
            }
        })
    }

    fn find_by_id(&self, id: SubjectId) -> Result<Option<UserRecord>, StoreError> {
        self.users.get(&id)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let username = username.trim();
        self.users
            .find(|u| u.identity.username.eq_ignore_ascii_case(username))
    }

    fn list(&self, tenant: Tenant, role: Option<Role>) -> Result<Vec<UserRecord>, StoreError> {
        let mut users = self.users.filter(|u| {
            u.identity.tenant == tenant && role.is_none_or(|r| u.identity.role == r)
        })?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    fn delete(&self, id: SubjectId) -> Result<bool, StoreError> {
        self.users.remove(&id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    courses: InMemoryCollection<Course>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CourseRepository for InMemoryCourseRepository {
    fn insert(&self, course: Course) -> Result<(), StoreError> {
        self.courses.write(|map| {
            if map
                .values()
                .any(|c| c.tenant == course.tenant && c.name == course.name)
            {
                return Err(StoreError::Duplicate(format!(
                    "course '{}' in tenant {}",
                    course.name, course.tenant
                )));
            }
            map.insert(course.id, course);
            Ok(())
        })
    }

    fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        self.courses.get(&id)
    }

    fn list(&self, tenant: Tenant) -> Result<Vec<Course>, StoreError> {
        let mut courses = self.courses.filter(|c| c.tenant == tenant)?;
        courses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courses)
    }

    fn delete(&self, id: CourseId) -> Result<bool, StoreError> {
        self.courses.remove(&id)
    }

    fn add_student(&self, id: CourseId, student: SubjectId) -> Result<bool, StoreError> {
        self.courses.write(|map| {
            let course = map.get_mut(&id).ok_or(StoreError::Missing("course"))?;
            Ok(course.enrolled_student_ids.insert(student))
        })
    }

    fn remove_student(&self, id: CourseId, student: SubjectId) -> Result<bool, StoreError> {
        self.courses.write(|map| {
            let course = map.get_mut(&id).ok_or(StoreError::Missing("course"))?;
            Ok(course.enrolled_student_ids.remove(&student))
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLogRepository {
    logs: InMemoryCollection<LogEntry>,
}

impl InMemoryLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogRepository for InMemoryLogRepository {
    fn insert(&self, log: LogEntry) -> Result<(), StoreError> {
        self.logs.write(|map| match map.entry(log.id) {
            Entry::Occupied(e) => Err(StoreError::Duplicate(format!("log {}", e.key()))),
            Entry::Vacant(e) => {
                e.insert(log);
                Ok(())
            }
        })
    }

    fn find_by_id(&self, id: LogId) -> Result<Option<LogEntry>, StoreError> {
        self.logs.get(&id)
    }

    fn list_for_course(&self, course_id: CourseId) -> Result<Vec<LogEntry>, StoreError> {
        let mut logs = self.logs.filter(|l| l.course_id == course_id)?;
        logs.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
        Ok(logs)
    }

    fn delete(&self, id: LogId) -> Result<bool, StoreError> {
        self.logs.remove(&id)
    }

    fn delete_for_course(&self, course_id: CourseId) -> Result<usize, StoreError> {
        self.logs.retain(|l| l.course_id != course_id)
    }
}
