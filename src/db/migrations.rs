//! Schema migrations for the local database.
//!
//! The local store mirrors the hosted database's tables. Each migration runs
//! once, in version order, inside one transaction, and is recorded in the
//! `migrations` table.
//!
//! ```rust
//! use backoffice::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory().unwrap();
//! init_with_migrations(&mut conn).unwrap();
//! assert!(get_db_version(&conn).unwrap() >= 1);
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: members and attendance
        self.add_migration(1, "create_members_and_attendance", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS members (
                    id INTEGER PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    role TEXT NOT NULL DEFAULT 'employee',
                    password_hash TEXT NOT NULL,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    login_count INTEGER NOT NULL DEFAULT 0,
                    last_login_at TEXT,
                    created_at TEXT NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS attendance_records (
                    id INTEGER PRIMARY KEY,
                    member_id INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
                    work_date TEXT NOT NULL,
                    check_in TEXT NOT NULL,
                    check_out TEXT,
                    break_minutes INTEGER NOT NULL DEFAULT 0,
                    status TEXT NOT NULL DEFAULT 'present',
                    note TEXT,
                    UNIQUE (member_id, work_date)
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_attendance_work_date ON attendance_records(work_date)", [])?;
            Ok(())
        });

        // Version 2: company schedules
        self.add_migration(2, "create_company_schedules", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS company_schedules (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT,
                    category TEXT NOT NULL DEFAULT 'meeting',
                    start_at TEXT NOT NULL,
                    end_at TEXT NOT NULL,
                    location TEXT,
                    created_by INTEGER
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_schedules_start_at ON company_schedules(start_at)", [])?;
            Ok(())
        });

        // Version 3: KPI indicators, targets and progress
        self.add_migration(3, "create_kpi_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS kpi_indicators (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    unit TEXT NOT NULL,
                    category TEXT NOT NULL,
                    description TEXT
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS kpi_targets (
                    id INTEGER PRIMARY KEY,
                    indicator_id INTEGER NOT NULL REFERENCES kpi_indicators(id),
                    member_id INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
                    period TEXT NOT NULL,
                    target_value REAL NOT NULL,
                    UNIQUE (indicator_id, member_id, period)
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS kpi_progress_records (
                    id INTEGER PRIMARY KEY,
                    target_id INTEGER NOT NULL REFERENCES kpi_targets(id) ON DELETE CASCADE,
                    value REAL NOT NULL,
                    note TEXT,
                    recorded_by INTEGER,
                    recorded_at TEXT NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_kpi_targets_period ON kpi_targets(period)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_kpi_progress_target ON kpi_progress_records(target_id)", [])?;
            Ok(())
        });

        // Version 4: news, recruitment and expenses
        self.add_migration(4, "create_news_recruitment_expenses", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS news_articles (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    summary TEXT,
                    body TEXT NOT NULL,
                    category TEXT NOT NULL DEFAULT 'general',
                    is_published INTEGER NOT NULL DEFAULT 0,
                    published_at TEXT,
                    author_id INTEGER,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS recruitment_interviews (
                    id INTEGER PRIMARY KEY,
                    candidate_name TEXT NOT NULL,
                    email TEXT,
                    position TEXT NOT NULL,
                    stage TEXT NOT NULL DEFAULT 'applied',
                    interview_at TEXT,
                    interviewer TEXT,
                    rating INTEGER,
                    notes TEXT,
                    created_at TEXT NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS monthly_expenses (
                    id INTEGER PRIMARY KEY,
                    month TEXT NOT NULL,
                    category TEXT NOT NULL,
                    amount REAL NOT NULL,
                    description TEXT,
                    recorded_by INTEGER
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_expenses_month ON monthly_expenses(month)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded version, all in one transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));
        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
