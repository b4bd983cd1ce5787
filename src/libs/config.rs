//! Configuration for the back-office CLI.
//!
//! The configuration is a JSON file (`config.json`) in the per-user data
//! directory. Every section is optional:
//!
//! - **database**: hosted REST endpoint and its API keys; without it the
//!   local SQLite database is used
//! - **admin**: the bootstrap administrator (email, name, Argon2 hash)
//! - **session**: session age, idle timeout and activity timings
//! - **workday**: official start time and standard hours for attendance
//!
//! Database credentials may also come from the environment (or a `.env`
//! file); environment values win over the file.
//!
//! ```rust,no_run
//! use backoffice::libs::config::Config;
//!
//! let config = Config::read()?;
//! let database = config.resolve_database();
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::activity::ActivityDebouncer;
use crate::libs::auth::hash_password;
use crate::libs::messages::Message;
use crate::libs::session::SessionPolicy;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use chrono::{Duration, NaiveTime};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Password};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DB_URL_ENV: &str = "BACKOFFICE_DB_URL";
pub const ANON_KEY_ENV: &str = "BACKOFFICE_ANON_KEY";
pub const SERVICE_KEY_ENV: &str = "BACKOFFICE_SERVICE_KEY";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_key: Option<String>,
}

/// The bootstrap administrator. Only a password hash is ever stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AdminConfig {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub max_age_hours: i64,
    pub idle_minutes: i64,
    pub check_interval_secs: u64,
    pub activity_delay_secs: i64,
    pub activity_min_gap_secs: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WorkdayConfig {
    /// Check-ins after this time (`HH:MM`) count as late.
    pub start_time: String,
    pub standard_hours: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workday: Option<WorkdayConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_age_hours: 24,
            idle_minutes: 30,
            check_interval_secs: 60,
            activity_delay_secs: 5,
            activity_min_gap_secs: 10,
        }
    }
}

impl SessionConfig {
    pub fn policy(&self) -> SessionPolicy {
        SessionPolicy {
            max_age: Duration::hours(self.max_age_hours),
            idle_timeout: Duration::minutes(self.idle_minutes),
            activity_min_gap: Duration::seconds(self.activity_min_gap_secs),
        }
    }

    pub fn debouncer(&self) -> ActivityDebouncer {
        ActivityDebouncer::new(
            Duration::seconds(self.activity_delay_secs),
            Duration::seconds(self.activity_min_gap_secs),
        )
    }

    pub fn check_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.check_interval_secs.max(1))
    }
}

impl Default for WorkdayConfig {
    fn default() -> Self {
        WorkdayConfig {
            start_time: "09:00".to_string(),
            standard_hours: 8.0,
        }
    }
}

impl WorkdayConfig {
    pub fn start(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.start_time.trim(), "%H:%M")
            .map_err(|_| msg_error_anyhow!(Message::InvalidWorkdayStart(self.start_time.clone())))
    }

    pub fn standard(&self) -> Duration {
        Duration::minutes((self.standard_hours * 60.0).round() as i64)
    }
}

impl DatabaseConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "database".to_string(),
            name: "Database".to_string(),
        }
    }

    /// Overlays environment values on `base`; `None` unless both the URL and the anon key end up set.
    pub fn from_vars(base: Option<&DatabaseConfig>, lookup: impl Fn(&str) -> Option<String>) -> Option<DatabaseConfig> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let url = var(DB_URL_ENV).or_else(|| base.map(|b| b.url.clone()))?;
        let anon_key = var(ANON_KEY_ENV).or_else(|| base.map(|b| b.anon_key.clone()))?;
        if url.trim().is_empty() || anon_key.trim().is_empty() {
            return None;
        }
        let service_key = var(SERVICE_KEY_ENV)
            .or_else(|| base.and_then(|b| b.service_key.clone()))
            .filter(|k| !k.trim().is_empty());
        Some(DatabaseConfig { url, anon_key, service_key })
    }

    pub fn init(config: &Option<DatabaseConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or(DatabaseConfig {
            url: "".to_string(),
            anon_key: "".to_string(),
            service_key: None,
        });
        msg_print!(Message::ConfigModuleDatabase);
        let url: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptDbUrl.to_string())
            .default(config.url)
            .interact_text()?;
        let anon_key: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptAnonKey.to_string())
            .default(config.anon_key)
            .interact_text()?;
        let service_key: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptServiceKey.to_string())
            .default(config.service_key.unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        Ok(Self {
            url: url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
            service_key: Some(service_key).filter(|k| !k.trim().is_empty()),
        })
    }
}

impl AdminConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "admin".to_string(),
            name: "Administrator".to_string(),
        }
    }

    pub fn init(config: &Option<AdminConfig>) -> Result<Self> {
        msg_print!(Message::ConfigModuleAdmin);
        let email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptAdminEmail.to_string())
            .default(config.as_ref().map(|c| c.email.clone()).unwrap_or_default())
            .interact_text()?;
        let name: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptAdminName.to_string())
            .default(config.as_ref().map(|c| c.name.clone()).unwrap_or_else(|| "Administrator".to_string()))
            .interact_text()?;
        let password = prompt_new_password()?;
        Ok(Self {
            email: email.trim().to_lowercase(),
            name,
            password_hash: hash_password(&password)?,
        })
    }
}

/// Asks for a password twice and returns it once both entries match.
pub fn prompt_new_password() -> Result<String> {
    Ok(Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .with_confirmation(Message::PromptPasswordConfirm.to_string(), Message::PasswordsDoNotMatch.to_string())
        .interact()?)
}

impl Config {
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&config_str)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Hosted database settings after applying the environment, if any are configured.
    pub fn resolve_database(&self) -> Option<DatabaseConfig> {
        DatabaseConfig::from_vars(self.database.as_ref(), |name| env::var(name).ok())
    }

    pub fn session(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    pub fn workday(&self) -> WorkdayConfig {
        self.workday.clone().unwrap_or_default()
    }

    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            DatabaseConfig::module(),
            AdminConfig::module(),
            ConfigModule {
                key: "session".to_string(),
                name: "Session".to_string(),
            },
            ConfigModule {
                key: "workday".to_string(),
                name: "Workday".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "database" => config.database = Some(DatabaseConfig::init(&config.database)?),
                "admin" => config.admin = Some(AdminConfig::init(&config.admin)?),
                "session" => {
                    let default = config.session();
                    msg_print!(Message::ConfigModuleSession);
                    config.session = Some(SessionConfig {
                        max_age_hours: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptMaxAgeHours.to_string())
                            .default(default.max_age_hours)
                            .interact_text()?,
                        idle_minutes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptIdleMinutes.to_string())
                            .default(default.idle_minutes)
                            .interact_text()?,
                        ..default
                    });
                }
                "workday" => {
                    let default = config.workday();
                    msg_print!(Message::ConfigModuleWorkday);
                    let workday = WorkdayConfig {
                        start_time: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptWorkdayStart.to_string())
                            .default(default.start_time)
                            .interact_text()?,
                        standard_hours: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptStandardHours.to_string())
                            .default(default.standard_hours)
                            .interact_text()?,
                    };
                    workday.start()?;
                    config.workday = Some(workday);
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
