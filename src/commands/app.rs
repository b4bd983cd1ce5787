//! Per-invocation context shared by the data-manager commands.

use crate::api::{Clients, Database};
use crate::db::attendance::Attendance;
use crate::db::db::Db;
use crate::db::members::Members;
use crate::libs::clock::SystemClock;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::role::{Access, Manager};
use crate::libs::session::{AdminUser, FileSessionStore, SessionContext, SessionState};
use crate::{msg_bail_anyhow, msg_debug};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::collections::HashMap;

pub struct App {
    pub config: Config,
    pub clients: Clients,
    pub session: SessionContext<FileSessionStore, SystemClock>,
}

impl App {
    /// Reads the configuration and connects to the hosted database, or the local one when none is configured.
    pub fn load() -> Result<Self> {
        let config = Config::read()?;
        let clients = match config.resolve_database() {
            Some(database) => {
                msg_debug!(Message::UsingHostedDatabase(database.url.clone()));
                Clients::hosted(&database)
            }
            None => Clients::local(&Db::default_path()?)?,
        };
        let session = SessionContext::with_policy(FileSessionStore::new()?, SystemClock, config.session().policy());
        Ok(Self { config, clients, session })
    }

    pub fn db(&self) -> &Database {
        self.clients.standard()
    }

    /// Restores the session, records the activity and checks the role.
    pub fn require(&mut self, manager: Manager, access: Access) -> Result<AdminUser> {
        match self.session.check_session()? {
            SessionState::Authenticated => {}
            SessionState::Expired => msg_bail_anyhow!(Message::SessionExpired),
            SessionState::Unauthenticated => msg_bail_anyhow!(Message::NotLoggedIn),
        }
        self.session.update_user_activity()?;
        let Some(user) = self.session.user().cloned() else {
            msg_bail_anyhow!(Message::NotLoggedIn);
        };
        if !user.role.allows(manager, access) {
            msg_bail_anyhow!(Message::AccessDenied(manager.to_string()));
        }
        Ok(user)
    }

    /// Like [`App::require`], additionally demanding the executive role.
    pub fn require_executive(&mut self, manager: Manager) -> Result<AdminUser> {
        let user = self.require(manager, Access::Write)?;
        if !user.role.is_executive() {
            msg_bail_anyhow!(Message::AccessDenied(manager.to_string()));
        }
        Ok(user)
    }

    pub fn attendance(&self) -> Result<Attendance<'_, Database>> {
        let workday = self.config.workday();
        Ok(Attendance::new(self.db(), workday.start()?, workday.standard()))
    }

    /// Member names visible to `user`: everyone for executives, themselves otherwise.
    pub async fn names(&self, user: &AdminUser) -> Result<HashMap<i64, String>> {
        if user.role.is_executive() {
            return Members::new(self.clients.elevated()).names().await;
        }
        Ok(user.member_id().map(|id| HashMap::from([(id, user.name.clone())])).unwrap_or_default())
    }
}

/// The member a command acts for. Employees always act for themselves;
/// executives may name another member.
pub fn acting_member(user: &AdminUser, requested: Option<i64>) -> Result<i64> {
    if user.role.is_executive() {
        if let Some(id) = requested.or(user.member_id()) {
            return Ok(id);
        }
        msg_bail_anyhow!(Message::MemberRequired);
    }
    match user.member_id() {
        Some(id) => Ok(id),
        None => msg_bail_anyhow!(Message::MemberRequired),
    }
}

/// Filter for listings: employees see their own rows, executives whatever they ask for.
pub fn visible_member(user: &AdminUser, requested: Option<i64>) -> Option<i64> {
    if user.role.is_executive() {
        requested
    } else {
        user.member_id().or(Some(-1))
    }
}

/// Asks before a destructive change; defaults to no.
pub fn confirm(what: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDelete(what.to_string()).to_string())
        .default(false)
        .interact()?)
}

pub fn current_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
