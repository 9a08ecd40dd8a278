use serde::{Deserialize, Serialize};

use coursegate_core::{SubjectId, Tenant};

use crate::Role;

/// The (subject, role, tenant) triple every authorization decision is keyed by.
///
/// Carried across requests inside a signed token; serialized in the session
/// shape `{ id, username, role, tenant }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "id")]
    pub subject_id: SubjectId,
    pub username: String,
    pub role: Role,
    pub tenant: Tenant,
}

impl Identity {
    pub fn new(subject_id: SubjectId, username: impl Into<String>, role: Role, tenant: Tenant) -> Self {
        Self {
            subject_id,
            username: username.into(),
            role,
            tenant,
        }
    }

    pub fn is(&self, subject_id: SubjectId) -> bool {
        self.subject_id == subject_id
    }
}
