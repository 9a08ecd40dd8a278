//! Tenant-scoped user directory.

use std::sync::Arc;

use coursegate_auth::{
    Identity, Role, UserScope, authorize_user_lookup, authorize_user_read, user_directory_scope,
};
use coursegate_core::SubjectId;
use coursegate_infra::UserRepository;

use crate::app::dto::UserSummary;
use crate::app::errors::ServiceError;
use crate::authz::enforce;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Newest accounts first.
    pub fn list(&self, identity: &Identity) -> Result<Vec<UserSummary>, ServiceError> {
        let scope = enforce(identity, user_directory_scope(identity))?;
        let role = match scope {
            UserScope::AllIn(_) => None,
            UserScope::StudentsIn(_) => Some(Role::Student),
        };
        Ok(self
            .users
            .list(scope.tenant(), role)?
            .into_iter()
            .filter(|u| scope.admits(&u.identity))
            .map(UserSummary::from)
            .collect())
    }

    /// Other tenants' accounts are reported as missing.
    pub fn get(&self, identity: &Identity, target: SubjectId) -> Result<UserSummary, ServiceError> {
        enforce(identity, authorize_user_lookup(identity, target))?;
        let record = self
            .users
            .find_by_id(target)?
            .filter(|u| u.identity.tenant == identity.tenant)
            .ok_or(ServiceError::NotFound("user"))?;
        enforce(identity, authorize_user_read(identity, &record.identity))?;
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegate_core::Tenant;

    use crate::app::services::fixtures::{register, services};

    #[test]
    fn students_never_list_users() {
        let svc = services();
        for tenant in Tenant::ALL {
            let student = register(&svc, &format!("s_{tenant}"), Role::Student, tenant);
            let err = svc.users.list(&student).unwrap_err();
            assert!(matches!(err, ServiceError::Unauthorized(_)));
        }
    }

    #[test]
    fn teachers_list_students_and_admins_list_everyone_in_tenant() {
        let svc = services();
        let admin = register(&svc, "root_uvu", Role::Admin, Tenant::Uvu);
        let prof = register(&svc, "prof_uvu", Role::Teacher, Tenant::Uvu);
        register(&svc, "s1", Role::Student, Tenant::Uvu);
        register(&svc, "s_uofu", Role::Student, Tenant::Uofu);

        let seen_by_prof: Vec<_> = svc.users.list(&prof).unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(seen_by_prof, ["s1"]);

        let seen_by_admin = svc.users.list(&admin).unwrap();
        assert_eq!(seen_by_admin.len(), 3);
        assert!(seen_by_admin.iter().all(|u| u.tenant == Tenant::Uvu));
        assert!(seen_by_admin.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn lookups_follow_directory_rules() {
        let svc = services();
        let admin = register(&svc, "root_uvu", Role::Admin, Tenant::Uvu);
        let prof = register(&svc, "prof_uvu", Role::Teacher, Tenant::Uvu);
        let s1 = register(&svc, "s1", Role::Student, Tenant::Uvu);
        let s2 = register(&svc, "s2", Role::Student, Tenant::Uvu);
        let foreign = register(&svc, "s_uofu", Role::Student, Tenant::Uofu);

        assert_eq!(svc.users.get(&s1, s1.subject_id).unwrap().username, "s1");
        assert!(matches!(svc.users.get(&s1, s2.subject_id), Err(ServiceError::Forbidden(_))));
        assert_eq!(svc.users.get(&prof, s2.subject_id).unwrap().username, "s2");
        assert!(matches!(svc.users.get(&prof, admin.subject_id), Err(ServiceError::Unauthorized(_))));
        assert_eq!(svc.users.get(&admin, prof.subject_id).unwrap().role, Role::Teacher);
        assert_eq!(
            svc.users.get(&admin, foreign.subject_id).unwrap_err(),
            ServiceError::NotFound("user")
        );
    }
}
