//! Process configuration, read from environment variables.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use coursegate_auth::{BcryptHasher, TokenService};
use coursegate_core::Tenant;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Admin account ensured at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
    pub tenant: Tenant,
}

impl core::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tenant", &self.tenant)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub min_password_len: usize,
    pub bcrypt_cost: u32,
    pub seed_admins: Vec<SeedAccount>,
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("min_password_len", &self.min_password_len)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("seed_admins", &self.seed_admins)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            jwt_secret: "dev-secret".to_string(),
            token_ttl: Duration::hours(TokenService::DEFAULT_TTL_HOURS),
            min_password_len: 6,
            bcrypt_cost: BcryptHasher::DEFAULT_COST,
            seed_admins: Vec::new(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("BIND_ADDR") {
            config.bind_addr = parse("BIND_ADDR", &v)?;
        }

        match lookup("JWT_SECRET") {
            Some(v) if !v.is_empty() => config.jwt_secret = v,
            _ => tracing::warn!("JWT_SECRET not set; using insecure dev default"),
        }

        if let Some(v) = lookup("TOKEN_TTL_HOURS") {
            let hours: i64 = parse("TOKEN_TTL_HOURS", &v)?;
            if hours <= 0 {
                return Err(invalid("TOKEN_TTL_HOURS", "must be positive"));
            }
            config.token_ttl = Duration::hours(hours);
        }

        if let Some(v) = lookup("MIN_PASSWORD_LEN") {
            config.min_password_len = parse("MIN_PASSWORD_LEN", &v)?;
        }

        if let Some(v) = lookup("BCRYPT_COST") {
            let cost: u32 = parse("BCRYPT_COST", &v)?;
            if !(4..=31).contains(&cost) {
                return Err(invalid("BCRYPT_COST", "must be between 4 and 31"));
            }
            config.bcrypt_cost = cost;
        }

        if let Some(v) = lookup("SEED_ADMINS") {
            config.seed_admins = parse_seed_admins(&v)?;
        }

        Ok(config)
    }
}

fn invalid(var: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.into(),
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| invalid(var, e.to_string()))
}

/// `user:password:tenant` entries separated by commas.
fn parse_seed_admins(raw: &str) -> Result<Vec<SeedAccount>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(username), Some(password), Some(tenant))
                    if !username.is_empty() && !password.is_empty() =>
                {
                    Ok(SeedAccount {
                        username: username.to_string(),
                        password: password.to_string(),
                        tenant: parse("SEED_ADMINS", tenant)?,
                    })
                }
                _ => Err(invalid("SEED_ADMINS", "expected user:password:tenant")),
            }
        })
        .collect()
}
