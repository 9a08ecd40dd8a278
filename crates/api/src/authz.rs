//! Translation of policy denials into service errors.
//!
//! Every denial is logged with the acting identity (never its token) before it
//! leaves the service layer.

use coursegate_auth::{AuthzError, Identity};

use crate::app::errors::ServiceError;

/// Turn a policy decision into a service result.
pub fn enforce<T>(identity: &Identity, decision: Result<T, AuthzError>) -> Result<T, ServiceError> {
    decision.map_err(|err| {
        tracing::warn!(
            subject_id = %identity.subject_id,
            role = %identity.role,
            tenant = %identity.tenant,
            reason = %err,
            "authorization denied"
        );
        if err.is_impersonation() {
            ServiceError::Forbidden(err.to_string())
        } else {
            ServiceError::Unauthorized(err.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegate_auth::{Action, Role};
    use coursegate_core::{SubjectId, Tenant};

    fn student() -> Identity {
        Identity::new(SubjectId::new(30_000_001).unwrap(), "s1", Role::Student, Tenant::Uvu)
    }

    #[test]
    fn impersonation_maps_to_forbidden() {
        let err = enforce::<()>(&student(), Err(AuthzError::NotSelf(Action::Enroll))).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[test]
    fn other_denials_map_to_unauthorized() {
        let err = enforce::<()>(&student(), Err(AuthzError::TenantMismatch)).unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized("tenant mismatch".to_string()));
    }

    #[test]
    fn allowed_decisions_pass_through() {
        assert_eq!(enforce(&student(), Ok(7)), Ok(7));
    }
}
