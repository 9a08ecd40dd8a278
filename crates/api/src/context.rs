use coursegate_auth::{Identity, Role};
use coursegate_core::{SubjectId, Tenant};

/// Authenticated identity for a request, attached by the request gate.
///
/// Every field is present by construction: a token missing any of them never
/// verifies, so handlers cannot observe a partial identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    identity: Identity,
}

impl PrincipalContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn subject_id(&self) -> SubjectId {
        self.identity.subject_id
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    pub fn tenant(&self) -> Tenant {
        self.identity.tenant
    }
}
