//! Column layout of every table the local store knows about.
//!
//! The local store builds its SQL from these definitions, so a column that
//! is not listed here can never reach a statement. The kind tells the store
//! how to turn SQLite values back into JSON (SQLite has no boolean type).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
    Bool,
}

#[derive(Debug)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [(&'static str, ColumnKind)],
}

impl TableSchema {
    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|(name, _)| *name == column).map(|(_, kind)| *kind)
    }

    pub fn column_list(&self) -> String {
        self.columns.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", ")
    }
}

use ColumnKind::*;

pub const MEMBERS: &str = "members";
pub const ATTENDANCE_RECORDS: &str = "attendance_records";
pub const COMPANY_SCHEDULES: &str = "company_schedules";
pub const KPI_INDICATORS: &str = "kpi_indicators";
pub const KPI_TARGETS: &str = "kpi_targets";
pub const KPI_PROGRESS_RECORDS: &str = "kpi_progress_records";
pub const NEWS_ARTICLES: &str = "news_articles";
pub const RECRUITMENT_INTERVIEWS: &str = "recruitment_interviews";
pub const MONTHLY_EXPENSES: &str = "monthly_expenses";

pub const TABLES: &[TableSchema] = &[
    TableSchema {
        name: MEMBERS,
        columns: &[
            ("id", Integer),
            ("email", Text),
            ("name", Text),
            ("role", Text),
            ("password_hash", Text),
            ("is_active", Bool),
            ("login_count", Integer),
            ("last_login_at", Text),
            ("created_at", Text),
        ],
    },
    TableSchema {
        name: ATTENDANCE_RECORDS,
        columns: &[
            ("id", Integer),
            ("member_id", Integer),
            ("work_date", Text),
            ("check_in", Text),
            ("check_out", Text),
            ("break_minutes", Integer),
            ("status", Text),
            ("note", Text),
        ],
    },
    TableSchema {
        name: COMPANY_SCHEDULES,
        columns: &[
            ("id", Integer),
            ("title", Text),
            ("description", Text),
            ("category", Text),
            ("start_at", Text),
            ("end_at", Text),
            ("location", Text),
            ("created_by", Integer),
        ],
    },
    TableSchema {
        name: KPI_INDICATORS,
        columns: &[("id", Integer), ("name", Text), ("unit", Text), ("category", Text), ("description", Text)],
    },
    TableSchema {
        name: KPI_TARGETS,
        columns: &[
            ("id", Integer),
            ("indicator_id", Integer),
            ("member_id", Integer),
            ("period", Text),
            ("target_value", Real),
        ],
    },
    TableSchema {
        name: KPI_PROGRESS_RECORDS,
        columns: &[
            ("id", Integer),
            ("target_id", Integer),
            ("value", Real),
            ("note", Text),
            ("recorded_by", Integer),
            ("recorded_at", Text),
        ],
    },
    TableSchema {
        name: NEWS_ARTICLES,
        columns: &[
            ("id", Integer),
            ("title", Text),
            ("summary", Text),
            ("body", Text),
            ("category", Text),
            ("is_published", Bool),
            ("published_at", Text),
            ("author_id", Integer),
            ("created_at", Text),
            ("updated_at", Text),
        ],
    },
    TableSchema {
        name: RECRUITMENT_INTERVIEWS,
        columns: &[
            ("id", Integer),
            ("candidate_name", Text),
            ("email", Text),
            ("position", Text),
            ("stage", Text),
            ("interview_at", Text),
            ("interviewer", Text),
            ("rating", Integer),
            ("notes", Text),
            ("created_at", Text),
        ],
    },
    TableSchema {
        name: MONTHLY_EXPENSES,
        columns: &[
            ("id", Integer),
            ("month", Text),
            ("category", Text),
            ("amount", Real),
            ("description", Text),
            ("recorded_by", Integer),
        ],
    },
];

pub fn table(name: &str) -> Option<&'static TableSchema> {
    TABLES.iter().find(|t| t.name == name)
}
