//! Course listing, creation, deletion and enrollment.

use std::sync::Arc;

use chrono::Utc;

use coursegate_auth::{
    Action, Identity, Role, authorize_course_create, authorize_course_delete,
    authorize_course_read, authorize_enrollment, course_visibility,
};
use coursegate_core::{Course, CourseId, SubjectId};
use coursegate_infra::{CourseRepository, LogRepository, UserRepository};

use crate::app::dto::NewCourse;
use crate::app::errors::ServiceError;
use crate::authz::enforce;

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
    logs: Arc<dyn LogRepository>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        users: Arc<dyn UserRepository>,
        logs: Arc<dyn LogRepository>,
    ) -> Self {
        Self {
            courses,
            users,
            logs,
        }
    }

    pub fn list(&self, identity: &Identity, all: bool) -> Result<Vec<Course>, ServiceError> {
        let scope = course_visibility(identity, all);
        let courses = self.courses.list(scope.tenant())?;
        Ok(courses.into_iter().filter(|c| scope.admits(c)).collect())
    }

    pub fn get(&self, identity: &Identity, id: CourseId) -> Result<Course, ServiceError> {
        let course = self.load(id)?;
        enforce(identity, authorize_course_read(identity, &course))?;
        Ok(course)
    }

    /// Teachers always own what they create; admins must name a teacher of their tenant.
    pub fn create(&self, identity: &Identity, input: NewCourse) -> Result<Course, ServiceError> {
        let tenant = input.tenant.unwrap_or(identity.tenant);
        enforce(identity, authorize_course_create(identity, tenant))?;

        let owner_id = match identity.role {
            Role::Teacher => identity.subject_id,
            _ => {
                let owner_id = input
                    .owner_id
                    .ok_or_else(|| ServiceError::validation("ownerId is required"))?;
                let owner = self
                    .users
                    .find_by_id(owner_id)?
                    .filter(|u| u.identity.tenant == tenant)
                    .ok_or(ServiceError::NotFound("owner"))?;
                if owner.identity.role != Role::Teacher {
                    return Err(ServiceError::validation("course owner must be a teacher"));
                }
                owner_id
            }
        };

        let course = Course::new(&input.name, tenant, owner_id, Utc::now())?;
        self.courses.insert(course.clone())?;
        tracing::info!(
            course_id = %course.id,
            tenant = %course.tenant,
            owner_id = %course.owner_id,
            created_by = %identity.subject_id,
            "course created"
        );
        Ok(course)
    }

    /// Log cleanup after the delete is best effort and never fails the request.
    pub fn delete(&self, identity: &Identity, id: CourseId) -> Result<(), ServiceError> {
        let course = self.load(id)?;
        enforce(identity, authorize_course_delete(identity, &course))?;

        if !self.courses.delete(id)? {
            return Err(ServiceError::NotFound("course"));
        }
        tracing::info!(course_id = %id, tenant = %course.tenant, deleted_by = %identity.subject_id, "course deleted");

        match self.logs.delete_for_course(id) {
            Ok(purged) => tracing::debug!(course_id = %id, purged, "course logs removed"),
            Err(err) => tracing::warn!(course_id = %id, error = %err, "failed to remove course logs"),
        }
        Ok(())
    }

    pub fn enroll(&self, identity: &Identity, id: CourseId, student: SubjectId) -> Result<Course, ServiceError> {
        let course = self.load(id)?;
        enforce(identity, authorize_enrollment(identity, &course, student, Action::Enroll))?;
        self.ensure_student(&course, student)?;

        if course.is_enrolled(student) || !self.courses.add_student(id, student)? {
            return Err(ServiceError::conflict("student is already enrolled"));
        }
        tracing::info!(course_id = %id, student = %student, by = %identity.subject_id, "student enrolled");
        self.load(id)
    }

    /// Membership alone decides; ids of deleted accounts can still be removed.
    pub fn unenroll(&self, identity: &Identity, id: CourseId, student: SubjectId) -> Result<Course, ServiceError> {
        let course = self.load(id)?;
        enforce(identity, authorize_enrollment(identity, &course, student, Action::Unenroll))?;

        if !course.is_enrolled(student) || !self.courses.remove_student(id, student)? {
            return Err(ServiceError::conflict("student is not enrolled"));
        }
        tracing::info!(course_id = %id, student = %student, by = %identity.subject_id, "student unenrolled");
        self.load(id)
    }

    fn load(&self, id: CourseId) -> Result<Course, ServiceError> {
        self.courses.find_by_id(id)?.ok_or(ServiceError::NotFound("course"))
    }

    /// Enrollment targets are looked up within the course's tenant only.
    fn ensure_student(&self, course: &Course, student: SubjectId) -> Result<(), ServiceError> {
        let record = self
            .users
            .find_by_id(student)?
            .filter(|u| u.identity.tenant == course.tenant)
            .ok_or(ServiceError::NotFound("student"))?;
        if record.identity.role != Role::Student {
            return Err(ServiceError::validation("only students can be enrolled"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegate_core::Tenant;

    use crate::app::services::AppServices;
    use crate::app::services::fixtures::{register, services};

    fn new_course(name: &str, owner: Option<SubjectId>) -> NewCourse {
        NewCourse {
            name: name.to_string(),
            tenant: None,
            owner_id: owner,
        }
    }

    struct Campus {
        svc: AppServices,
        admin: Identity,
        prof: Identity,
        student: Identity,
        uofu_admin: Identity,
        uofu_prof: Identity,
    }

    fn campus() -> Campus {
        let svc = services();
        let admin = register(&svc, "root_uvu", Role::Admin, Tenant::Uvu);
        let prof = register(&svc, "prof_uvu", Role::Teacher, Tenant::Uvu);
        let student = register(&svc, "s1", Role::Student, Tenant::Uvu);
        let uofu_admin = register(&svc, "root_uofu", Role::Admin, Tenant::Uofu);
        let uofu_prof = register(&svc, "prof_uofu", Role::Teacher, Tenant::Uofu);
        Campus {
            svc,
            admin,
            prof,
            student,
            uofu_admin,
            uofu_prof,
        }
    }

    #[test]
    fn admin_created_course_is_visible_only_inside_its_tenant() {
        let c = campus();
        let course = c
            .svc
            .courses
            .create(&c.admin, new_course("CS 101", Some(c.prof.subject_id)))
            .unwrap();
        assert_eq!(course.owner_id, c.prof.subject_id);

        let names = |courses: Vec<Course>| courses.into_iter().map(|c| c.name).collect::<Vec<_>>();
        assert_eq!(names(c.svc.courses.list(&c.admin, false).unwrap()), ["CS 101"]);
        assert_eq!(names(c.svc.courses.list(&c.prof, false).unwrap()), ["CS 101"]);
        assert!(c.svc.courses.list(&c.uofu_admin, true).unwrap().is_empty());
        assert!(c.svc.courses.list(&c.uofu_prof, true).unwrap().is_empty());
    }

    #[test]
    fn teacher_is_always_the_owner() {
        let c = campus();
        let course = c
            .svc
            .courses
            .create(&c.prof, new_course("Algorithms", Some(c.admin.subject_id)))
            .unwrap();
        assert_eq!(course.owner_id, c.prof.subject_id);
    }

    #[test]
    fn admin_must_name_a_teacher_owner() {
        let c = campus();
        let missing = c.svc.courses.create(&c.admin, new_course("CS 101", None)).unwrap_err();
        assert!(matches!(missing, ServiceError::Validation(_)));

        let not_teacher = c
            .svc
            .courses
            .create(&c.admin, new_course("CS 101", Some(c.student.subject_id)))
            .unwrap_err();
        assert!(matches!(not_teacher, ServiceError::Validation(_)));

        let foreign = c
            .svc
            .courses
            .create(&c.admin, new_course("CS 101", Some(c.uofu_prof.subject_id)))
            .unwrap_err();
        assert_eq!(foreign, ServiceError::NotFound("owner"));
    }

    #[test]
    fn declaring_another_tenant_is_denied() {
        let c = campus();
        let input = NewCourse {
            tenant: Some(Tenant::Uofu),
            ..new_course("CS 101", None)
        };
        let err = c.svc.courses.create(&c.prof, input).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn duplicate_course_name_in_tenant_conflicts() {
        let c = campus();
        c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap();
        let err = c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        c.svc.courses.create(&c.uofu_prof, new_course("CS 101", None)).unwrap();
    }

    #[test]
    fn students_create_nothing() {
        let c = campus();
        let err = c.svc.courses.create(&c.student, new_course("CS 101", None)).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn enrollment_is_conflict_checked_both_ways() {
        let c = campus();
        let course = c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap();

        let enrolled = c.svc.courses.enroll(&c.student, course.id, c.student.subject_id).unwrap();
        assert!(enrolled.is_enrolled(c.student.subject_id));

        let again = c.svc.courses.enroll(&c.prof, course.id, c.student.subject_id).unwrap_err();
        assert!(matches!(again, ServiceError::Conflict(_)));
        assert_eq!(c.svc.courses.get(&c.prof, course.id).unwrap().enrolled_student_ids.len(), 1);

        let left = c.svc.courses.unenroll(&c.student, course.id, c.student.subject_id).unwrap();
        assert!(!left.is_enrolled(c.student.subject_id));

        let not_enrolled = c.svc.courses.unenroll(&c.prof, course.id, c.student.subject_id).unwrap_err();
        assert!(matches!(not_enrolled, ServiceError::Conflict(_)));
    }

    #[test]
    fn students_cannot_enroll_someone_else() {
        let c = campus();
        let other = register(&c.svc, "s2", Role::Student, Tenant::Uvu);
        let course = c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap();

        let err = c.svc.courses.enroll(&c.student, course.id, other.subject_id).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(!c.svc.courses.get(&c.prof, course.id).unwrap().is_enrolled(other.subject_id));
    }

    #[test]
    fn deleted_student_can_still_be_unenrolled() {
        let c = campus();
        let course = c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap();
        c.svc.courses.enroll(&c.student, course.id, c.student.subject_id).unwrap();
        c.svc.auth.delete_account(&c.student, c.student.subject_id).unwrap();

        let course = c.svc.courses.unenroll(&c.prof, course.id, c.student.subject_id).unwrap();
        assert!(!course.is_enrolled(c.student.subject_id));

        let again = c.svc.courses.unenroll(&c.prof, course.id, c.student.subject_id).unwrap_err();
        assert!(matches!(again, ServiceError::Conflict(_)));
    }

    #[test]
    fn enrollment_targets_must_be_students_of_the_tenant() {
        let c = campus();
        let course = c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap();
        let foreign = register(&c.svc, "s_uofu", Role::Student, Tenant::Uofu);

        let err = c.svc.courses.enroll(&c.prof, course.id, foreign.subject_id).unwrap_err();
        assert_eq!(err, ServiceError::NotFound("student"));

        let err = c.svc.courses.enroll(&c.prof, course.id, c.prof.subject_id).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn cross_tenant_course_operations_are_denied() {
        let c = campus();
        let course = c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap();

        assert!(matches!(c.svc.courses.get(&c.uofu_admin, course.id), Err(ServiceError::Unauthorized(_))));
        assert!(matches!(
            c.svc.courses.enroll(&c.uofu_prof, course.id, c.student.subject_id),
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(c.svc.courses.delete(&c.uofu_admin, course.id), Err(ServiceError::Unauthorized(_))));
        assert!(c.svc.courses.get(&c.admin, course.id).is_ok());
    }

    #[test]
    fn only_the_owning_teacher_or_an_admin_deletes() {
        let c = campus();
        let other_prof = register(&c.svc, "prof2_uvu", Role::Teacher, Tenant::Uvu);
        let course = c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap();

        assert!(matches!(c.svc.courses.delete(&other_prof, course.id), Err(ServiceError::Unauthorized(_))));
        assert!(matches!(c.svc.courses.delete(&c.student, course.id), Err(ServiceError::Unauthorized(_))));

        c.svc.courses.delete(&c.admin, course.id).unwrap();
        assert_eq!(c.svc.courses.get(&c.admin, course.id).unwrap_err(), ServiceError::NotFound("course"));
    }

    #[test]
    fn all_flag_broadens_listing_within_tenant() {
        let c = campus();
        c.svc.courses.create(&c.prof, new_course("CS 101", None)).unwrap();
        assert!(c.svc.courses.list(&c.student, false).unwrap().is_empty());
        assert_eq!(c.svc.courses.list(&c.student, true).unwrap().len(), 1);
    }
}
