//! Course entity: a tenant-scoped class owned by one teacher.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CourseId, DomainError, DomainResult, Entity, SubjectId, Tenant};

/// A course within one tenant.
///
/// # Invariants
/// - `name` is non-empty (trimmed) and unique per tenant (enforced by storage).
/// - `enrolled_student_ids` only holds students of `tenant` (enforced by the services).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub tenant: Tenant,
    pub owner_id: SubjectId,
    pub enrolled_student_ids: BTreeSet<SubjectId>,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn new(
        name: &str,
        tenant: Tenant,
        owner_id: SubjectId,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("course name must not be empty"));
        }

        Ok(Self {
            id: CourseId::new(),
            name: name.to_string(),
            tenant,
            owner_id,
            enrolled_student_ids: BTreeSet::new(),
            created_at,
        })
    }

    pub fn is_owned_by(&self, subject_id: SubjectId) -> bool {
        self.owner_id == subject_id
    }

    pub fn is_enrolled(&self, subject_id: SubjectId) -> bool {
        self.enrolled_student_ids.contains(&subject_id)
    }
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
