//! Tenant partition (one per institution sharing the deployment).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Closed set of institutions served by one deployment.
///
/// No data or identity crosses a tenant boundary except through an equal-tenant check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tenant {
    Uvu,
    Uofu,
}

impl Tenant {
    pub const ALL: [Tenant; 2] = [Tenant::Uvu, Tenant::Uofu];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tenant::Uvu => "uvu",
            Tenant::Uofu => "uofu",
        }
    }
}

impl core::fmt::Display for Tenant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tenant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uvu" => Ok(Tenant::Uvu),
            "uofu" => Ok(Tenant::Uofu),
            other => Err(DomainError::validation(format!("unknown tenant '{other}'"))),
        }
    }
}
