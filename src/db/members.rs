use super::schema::MEMBERS;
use crate::api::{Backend, Filter, Query};
use crate::libs::auth::hash_password;
use crate::libs::messages::Message;
use crate::libs::role::Role;
use crate::libs::validation::{self, ValidationError};
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password_hash: String,
    pub is_active: bool,
    #[serde(default)]
    pub login_count: i64,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for a new member; the password is hashed before anything is stored.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: String,
}

impl NewMember {
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let email = validation::email(&self.email)?;
        let name = validation::required("name", &self.name)?;
        if self.password.chars().count() < 8 {
            return Err(ValidationError::new("password", "must be at least 8 characters"));
        }
        Ok((email, name))
    }
}

pub struct Members<'a, B: Backend> {
    backend: &'a B,
}

impl<'a, B: Backend> Members<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        let query = Query::table(MEMBERS).filter(Filter::eq("email", email.trim().to_lowercase()));
        Ok(self.backend.fetch_one(query).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Member>> {
        Ok(self.backend.fetch_one(Query::table(MEMBERS).filter(Filter::eq("id", id))).await?)
    }

    pub async fn list(&self) -> Result<Vec<Member>> {
        Ok(self.backend.fetch(&Query::table(MEMBERS).order_asc("name")).await?)
    }

    /// Member id to display name, for rendering rows that only carry ids.
    pub async fn names(&self) -> Result<HashMap<i64, String>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter_map(|m| m.id.map(|id| (id, m.name)))
            .collect())
    }

    pub async fn add(&self, member: &NewMember, now: DateTime<Utc>) -> Result<Member> {
        let (email, name) = member.validate()?;
        if self.find_by_email(&email).await?.is_some() {
            msg_bail_anyhow!(Message::MemberExists(email));
        }
        let row = Member {
            id: None,
            email,
            name,
            role: member.role,
            password_hash: hash_password(&member.password)?,
            is_active: true,
            login_count: 0,
            last_login_at: None,
            created_at: now,
        };
        Ok(self.backend.create(MEMBERS, &row).await?)
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<usize> {
        Ok(self.backend.update(MEMBERS, &[Filter::eq("id", id)], json!({ "is_active": active })).await?)
    }

    /// Bumps the login counter and stamps the login time.
    pub async fn record_login(&self, member: &Member, now: DateTime<Utc>) -> Result<usize> {
        let Some(id) = member.id else {
            return Ok(0);
        };
        let patch = json!({
            "login_count": member.login_count + 1,
            "last_login_at": now,
        });
        Ok(self.backend.update(MEMBERS, &[Filter::eq("id", id)], patch).await?)
    }
}
