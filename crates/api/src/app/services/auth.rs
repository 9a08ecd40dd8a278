//! Registration, login and account deletion.

use std::sync::Arc;

use chrono::Utc;

use coursegate_auth::{
    Identity, PasswordHasher, Role, TokenError, TokenService, authorize_account_deletion,
    ensure_same_tenant,
};
use coursegate_core::{SubjectId, Tenant};
use coursegate_infra::{StoreError, UserRecord, UserRepository};

use crate::app::dto::{Credentials, Registration};
use crate::app::errors::ServiceError;
use crate::authz::enforce;

/// Retries for subject id allocation before giving up.
const MAX_ID_ATTEMPTS: usize = 16;

/// A freshly authenticated identity and its token.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    hasher: Arc<dyn PasswordHasher>,
    min_password_len: usize,
}

/// Usernames are stored trimmed and lowercased.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        hasher: Arc<dyn PasswordHasher>,
        min_password_len: usize,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            min_password_len,
        }
    }

    pub fn register(&self, registration: Registration) -> Result<Session, ServiceError> {
        let username = normalize_username(&registration.username);
        if registration.password.chars().count() < self.min_password_len {
            return Err(ServiceError::validation(format!(
                "password must be at least {} characters",
                self.min_password_len
            )));
        }
        if self.users.find_by_username(&username)?.is_some() {
            return Err(ServiceError::conflict(format!("username '{username}' is taken")));
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        let identity = self.insert_with_fresh_id(
            &username,
            registration.role,
            registration.tenant,
            &password_hash,
        )?;
        tracing::info!(
            subject_id = %identity.subject_id,
            role = %identity.role,
            tenant = %identity.tenant,
            "account registered"
        );

        let token = self.issue(&identity)?;
        Ok(Session { identity, token })
    }

    /// Unknown username, tenant mismatch and wrong password are indistinguishable.
    pub fn login(&self, credentials: Credentials) -> Result<Session, ServiceError> {
        let username = normalize_username(&credentials.username);
        let Some(record) = self.users.find_by_username(&username)? else {
            tracing::debug!(reason = "unknown username", "login rejected");
            return Err(ServiceError::InvalidCredentials);
        };
        if record.identity.tenant != credentials.tenant {
            tracing::debug!(subject_id = %record.identity.subject_id, reason = "tenant mismatch", "login rejected");
            return Err(ServiceError::InvalidCredentials);
        }
        if !self.hasher.verify(&credentials.password, &record.password_hash)? {
            tracing::debug!(subject_id = %record.identity.subject_id, reason = "wrong password", "login rejected");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.issue(&record.identity)?;
        tracing::info!(subject_id = %record.identity.subject_id, tenant = %record.identity.tenant, "login succeeded");
        Ok(Session {
            identity: record.identity,
            token,
        })
    }

    /// Hard delete; courses and logs that reference the account are left as-is.
    pub fn delete_account(&self, identity: &Identity, target: SubjectId) -> Result<(), ServiceError> {
        enforce(identity, authorize_account_deletion(identity, target))?;
        let record = self
            .users
            .find_by_id(target)?
            .ok_or(ServiceError::NotFound("user"))?;
        enforce(identity, ensure_same_tenant(identity, record.identity.tenant))?;

        if !self.users.delete(target)? {
            return Err(ServiceError::NotFound("user"));
        }
        tracing::info!(
            subject_id = %identity.subject_id,
            target = %target,
            tenant = %record.identity.tenant,
            "account deleted"
        );
        Ok(())
    }

    /// Create an admin account unless the username already exists.
    ///
    /// Operator-supplied seed passwords are not held to `min_password_len`.
    /// Returns `true` when a new account was created.
    pub fn ensure_admin(&self, username: &str, password: &str, tenant: Tenant) -> Result<bool, ServiceError> {
        let username = normalize_username(username);
        if self.users.find_by_username(&username)?.is_some() {
            return Ok(false);
        }
        let password_hash = self.hasher.hash(password)?;
        let identity = self.insert_with_fresh_id(&username, Role::Admin, tenant, &password_hash)?;
        tracing::info!(subject_id = %identity.subject_id, tenant = %tenant, username = %username, "seeded admin account");
        Ok(true)
    }

    fn issue(&self, identity: &Identity) -> Result<String, ServiceError> {
        self.tokens
            .issue(identity)
            .map_err(|e: TokenError| ServiceError::Internal(e.to_string()))
    }

    fn insert_with_fresh_id(
        &self,
        username: &str,
        role: Role,
        tenant: Tenant,
        password_hash: &str,
    ) -> Result<Identity, ServiceError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let identity = Identity::new(SubjectId::generate(), username, role, tenant);
            let record = UserRecord {
                identity: identity.clone(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            };
            match self.users.insert(record) {
                Ok(()) => return Ok(identity),
                // A concurrent registration may have taken the username in the meantime.
                Err(StoreError::Duplicate(_)) if self.users.find_by_username(username)?.is_some() => {
                    return Err(ServiceError::conflict(format!("username '{username}' is taken")));
                }
                Err(StoreError::Duplicate(_)) => continue,
                Err(other) => return Err(other.into()),
            }
        }
        Err(ServiceError::Internal("could not allocate a subject id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::fixtures::{register, services};

    fn creds(username: &str, password: &str, tenant: Tenant) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
            tenant,
        }
    }

    #[test]
    fn register_issues_a_verifiable_session() {
        let svc = services();
        let session = svc
            .auth
            .register(Registration {
                username: "  Prof_UVU ".into(),
                password: "password1".into(),
                role: Role::Teacher,
                tenant: Tenant::Uvu,
            })
            .unwrap();

        assert_eq!(session.identity.username, "prof_uvu");
        let verified = svc.auth.tokens.verify(&session.token).unwrap();
        assert_eq!(verified, session.identity);
    }

    #[test]
    fn short_password_is_a_validation_error() {
        let svc = services();
        let err = svc
            .auth
            .register(Registration {
                username: "s1".into(),
                password: "12345".into(),
                role: Role::Student,
                tenant: Tenant::Uvu,
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn usernames_are_unique_across_tenants_and_case() {
        let svc = services();
        register(&svc, "s1", Role::Student, Tenant::Uvu);
        let err = svc
            .auth
            .register(Registration {
                username: "S1".into(),
                password: "password1".into(),
                role: Role::Student,
                tenant: Tenant::Uofu,
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn wrong_tenant_fails_exactly_like_wrong_password() {
        let svc = services();
        register(&svc, "s1", Role::Student, Tenant::Uvu);

        let wrong_tenant = svc.auth.login(creds("s1", "password1", Tenant::Uofu)).unwrap_err();
        let wrong_password = svc.auth.login(creds("s1", "nope-nope", Tenant::Uvu)).unwrap_err();
        let unknown = svc.auth.login(creds("ghost", "password1", Tenant::Uvu)).unwrap_err();

        assert_eq!(wrong_tenant, ServiceError::InvalidCredentials);
        assert_eq!(wrong_tenant, wrong_password);
        assert_eq!(wrong_tenant.to_string(), unknown.to_string());
    }

    #[test]
    fn login_is_case_insensitive_on_username() {
        let svc = services();
        let id = register(&svc, "s1", Role::Student, Tenant::Uvu);
        let session = svc.auth.login(creds("S1", "password1", Tenant::Uvu)).unwrap();
        assert_eq!(session.identity, id);
    }

    #[test]
    fn deleting_a_missing_user_is_not_found() {
        let svc = services();
        let admin = register(&svc, "root_uvu", Role::Admin, Tenant::Uvu);
        let ghost = SubjectId::new(12_345_678).unwrap();
        assert_eq!(
            svc.auth.delete_account(&admin, ghost).unwrap_err(),
            ServiceError::NotFound("user")
        );
    }

    #[test]
    fn admin_cannot_delete_another_tenants_user() {
        let svc = services();
        let admin = register(&svc, "root_uvu", Role::Admin, Tenant::Uvu);
        let other = register(&svc, "s_uofu", Role::Student, Tenant::Uofu);
        let err = svc.auth.delete_account(&admin, other.subject_id).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert!(svc.auth.users.find_by_id(other.subject_id).unwrap().is_some());
    }

    #[test]
    fn users_may_delete_themselves_but_not_others() {
        let svc = services();
        let s1 = register(&svc, "s1", Role::Student, Tenant::Uvu);
        let s2 = register(&svc, "s2", Role::Student, Tenant::Uvu);

        let err = svc.auth.delete_account(&s1, s2.subject_id).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        svc.auth.delete_account(&s1, s1.subject_id).unwrap();
        assert!(svc.auth.users.find_by_id(s1.subject_id).unwrap().is_none());
    }

    #[test]
    fn ensure_admin_is_idempotent_and_accepts_short_seed_passwords() {
        let svc = services();
        assert!(svc.auth.ensure_admin("root_uvu", "willy", Tenant::Uvu).unwrap());
        assert!(!svc.auth.ensure_admin("ROOT_UVU", "willy", Tenant::Uvu).unwrap());

        let session = svc.auth.login(creds("root_uvu", "willy", Tenant::Uvu)).unwrap();
        assert_eq!(session.identity.role, Role::Admin);
    }
}
