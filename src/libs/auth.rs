//! Credential checks.
//!
//! Every credential, the bootstrap administrator's included, goes through
//! [`verify_password`]: Argon2id PHC hashes are verified locally, anything
//! else is treated as a legacy hash and compared against the database's
//! `hash_password` function. No plaintext credential exists anywhere.

use crate::api::Backend;
use crate::db::members::Members;
use crate::libs::config::AdminConfig;
use crate::libs::messages::Message;
use crate::libs::role::Role;
use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, warn};

const PHC_PREFIX: &str = "$argon2";
pub const BOOTSTRAP_ADMIN_ID: &str = "admin";

/// Produces an Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!(Message::PasswordHashFailed(e.to_string())))
}

/// Checks `password` against a stored hash.
///
/// Returns `Ok(false)` on mismatch and `Err` only when the stored hash is
/// malformed or the database cannot be reached for a legacy hash.
pub async fn verify_password<B: Backend>(backend: &B, password: &str, stored: &str) -> Result<bool> {
    if stored.starts_with(PHC_PREFIX) {
        let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("invalid password hash: {}", e))?;
        return match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow!("password verification failed: {}", e)),
        };
    }

    let hashed = backend.rpc("hash_password", json!({ "password": password })).await?;
    Ok(matches!(hashed, Value::String(ref h) if h == stored))
}

/// Who a successful credential check identified.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[allow(async_fn_in_trait)]
pub trait Authenticate {
    /// `None` for any failure: unknown account, wrong password, inactive member or unreachable database.
    ///
    /// `now` is the login time recorded on the member row.
    async fn authenticate(&self, email: &str, password: &str, now: DateTime<Utc>) -> Option<Identity>;
}

/// Checks the bootstrap administrator first, then the `members` table.
pub struct Authenticator<'a, B: Backend> {
    standard: &'a B,
    elevated: &'a B,
    admin: Option<&'a AdminConfig>,
}

impl<'a, B: Backend> Authenticator<'a, B> {
    pub fn new(standard: &'a B, elevated: &'a B, admin: Option<&'a AdminConfig>) -> Self {
        Self { standard, elevated, admin }
    }

    async fn authenticate_admin(&self, admin: &AdminConfig, password: &str) -> Option<Identity> {
        match verify_password(self.standard, password, &admin.password_hash).await {
            Ok(true) => Some(Identity {
                id: BOOTSTRAP_ADMIN_ID.to_string(),
                email: admin.email.to_lowercase(),
                name: admin.name.clone(),
                role: Role::Executive,
            }),
            Ok(false) => None,
            Err(e) => {
                warn!("{}", Message::CredentialCheckFailed(e.to_string()));
                None
            }
        }
    }

    async fn authenticate_member(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<Option<Identity>> {
        let Some(member) = Members::new(self.standard).find_by_email(email).await? else {
            debug!(email, "no such member");
            return Ok(None);
        };
        if !member.is_active {
            debug!(email, "member is inactive");
            return Ok(None);
        }
        if !verify_password(self.standard, password, &member.password_hash).await? {
            return Ok(None);
        }

        if let Err(e) = Members::new(self.elevated).record_login(&member, now).await {
            warn!("{}", Message::LoginBookkeepingFailed(e.to_string()));
        }

        Ok(Some(Identity {
            id: member.id.map(|id| id.to_string()).unwrap_or_default(),
            email: member.email,
            name: member.name,
            role: member.role,
        }))
    }
}

impl<'a, B: Backend> Authenticate for Authenticator<'a, B> {
    async fn authenticate(&self, email: &str, password: &str, now: DateTime<Utc>) -> Option<Identity> {
        let email = email.trim().to_lowercase();
        if let Some(admin) = self.admin.filter(|a| a.email.eq_ignore_ascii_case(&email)) {
            return self.authenticate_admin(admin, password).await;
        }
        match self.authenticate_member(&email, password, now).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("{}", Message::CredentialCheckFailed(e.to_string()));
                None
            }
        }
    }
}
