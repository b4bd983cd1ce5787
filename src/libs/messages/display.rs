//! Display implementation for backoffice messages.
//!
//! All user-facing text lives here so the rest of the code only deals with
//! [`Message`] variants and their parameters.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let s = match self {
            // === SESSION MESSAGES ===
            Message::LoginSucceeded(name, role) => format!("Signed in as {} ({})", name, role),
            Message::LoginFailed => "Invalid email or password".to_string(),
            Message::LoggedOut => "Signed out".to_string(),
            Message::NotLoggedIn => "You are not signed in. Run `backoffice login` first".to_string(),
            Message::SessionExpired => "Your session has expired. Please sign in again".to_string(),
            Message::SessionEndedElsewhere => "Signed out from another command".to_string(),
            Message::SessionDiscarded => "Stored session could not be read and was discarded".to_string(),
            Message::SessionStatus {
                name,
                email,
                role,
                expires_at,
                idle_for,
            } => format!(
                "Signed in as {} <{}>\nRole: {}\nSession expires: {}\nIdle for: {}",
                name, email, role, expires_at, idle_for
            ),
            Message::AccessDenied(manager) => format!("Your role does not allow access to {}", manager),
            Message::WatchStarted(interval) => format!(
                "Watching session (validity check every {}s). Press Enter to register activity, Ctrl+C to stop",
                interval
            ),
            Message::WatchStopped => "Session watch stopped".to_string(),
            Message::WatchInputClosed => "Input closed, session watch finished".to_string(),
            Message::ActivityRecorded(time) => format!("Activity recorded at {}", time),

            // === AUTHENTICATION MESSAGES ===
            Message::CredentialCheckFailed(err) => format!("Could not verify credentials: {}", err),
            Message::LoginBookkeepingFailed(err) => format!("Could not update login statistics: {}", err),
            Message::ElevatedClientMissing => "Service key is not configured, falling back to the standard database client".to_string(),
            Message::PasswordHash(hash) => format!("Password hash:\n{}", hash),
            Message::PasswordsDoNotMatch => "Passwords do not match".to_string(),
            Message::PasswordHashFailed(err) => format!("Failed to hash password: {}", err),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::ConfigModuleAdmin => "Bootstrap administrator settings".to_string(),
            Message::ConfigModuleSession => "Session settings".to_string(),
            Message::ConfigModuleWorkday => "Workday settings".to_string(),
            Message::UsingLocalDatabase(path) => format!("No hosted database configured, using local database at {}", path),
            Message::UsingHostedDatabase(url) => format!("Using hosted database at {}", url),
            Message::InvalidWorkdayStart(value) => format!("Invalid workday start time '{}', expected HH:MM", value),

            // === DATABASE MESSAGES ===
            Message::DbRequestFailed(err) => format!("Database request failed: {}", err),
            Message::MigrationsFound(count) => format!("Found {} pending migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, err) => format!("Migration v{} failed: {}", version, err),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),

            // === VALIDATION MESSAGES ===
            Message::ValidationFailed(reason) => format!("Invalid input: {}", reason),
            Message::InvalidMonth(value) => format!("Invalid month '{}', expected YYYY-MM", value),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected YYYY-MM-DD", value),
            Message::InvalidTime(value) => format!("Invalid time '{}', expected YYYY-MM-DD HH:MM", value),

            // === ATTENDANCE MESSAGES ===
            Message::CheckedIn(time, status) => format!("Checked in at {} ({})", time, status),
            Message::CheckedOut(time, worked) => format!("Checked out at {}, worked {}", time, worked),
            Message::AlreadyCheckedIn(date) => format!("Already checked in on {}", date),
            Message::NotCheckedIn(date) => format!("No check-in recorded on {}", date),
            Message::AlreadyCheckedOut(date) => format!("Already checked out on {}", date),
            Message::AttendanceUpdated(id) => format!("Attendance record {} updated", id),
            Message::AttendanceDeleted(id) => format!("Attendance record {} deleted", id),
            Message::AttendanceNotFound(id) => format!("Attendance record {} not found", id),
            Message::AttendanceHeader(month) => format!("Attendance for {}", month),
            Message::NoAttendance(month) => format!("No attendance records for {}", month),
            Message::AttendanceSummaryHeader(month) => format!("Attendance summary for {}", month),

            // === SCHEDULE MESSAGES ===
            Message::ScheduleAdded(title) => format!("Schedule '{}' added", title),
            Message::ScheduleUpdated(id) => format!("Schedule {} updated", id),
            Message::ScheduleDeleted(id) => format!("Schedule {} deleted", id),
            Message::ScheduleNotFound(id) => format!("Schedule {} not found", id),
            Message::SchedulesHeader(month) => format!("Company schedule for {}", month),
            Message::NoSchedules(month) => format!("Nothing scheduled for {}", month),

            // === KPI MESSAGES ===
            Message::IndicatorAdded(name) => format!("KPI indicator '{}' added", name),
            Message::IndicatorDeleted(id) => format!("KPI indicator {} deleted", id),
            Message::IndicatorNotFound(id) => format!("KPI indicator {} not found", id),
            Message::IndicatorInUse(id) => format!("KPI indicator {} still has targets and cannot be deleted", id),
            Message::IndicatorsHeader => "KPI indicators".to_string(),
            Message::NoIndicators => "No KPI indicators defined".to_string(),
            Message::TargetSaved(indicator, period) => format!("Target for '{}' in {} saved", indicator, period),
            Message::TargetNotFound(id) => format!("KPI target {} not found", id),
            Message::TargetDeleted(id) => format!("KPI target {} deleted", id),
            Message::TargetsHeader(period) => format!("KPI targets for {}", period),
            Message::NoTargets(period) => format!("No KPI targets for {}", period),
            Message::ProgressRecorded(rate) => format!("Progress recorded, achievement is now {}", rate),
            Message::ProgressHeader(id) => format!("Progress for target {}", id),
            Message::NoProgress(id) => format!("No progress recorded for target {}", id),
            Message::KpiOverviewHeader(period) => format!("KPI achievement for {}", period),

            // === RECRUITMENT MESSAGES ===
            Message::CandidateAdded(name) => format!("Candidate '{}' added", name),
            Message::CandidateNotFound(id) => format!("Candidate {} not found", id),
            Message::StageChanged(name, stage) => format!("{} moved to {}", name, stage),
            Message::InvalidStageTransition(from, to) => format!("Cannot move a candidate from {} to {}", from, to),
            Message::CandidateRated(name, rating) => format!("{} rated {}/5", name, rating),
            Message::InterviewScheduled(name, at) => format!("Interview with {} set for {}", name, at),
            Message::CandidateDeleted(id) => format!("Candidate {} deleted", id),
            Message::CandidatesHeader => "Recruitment interviews".to_string(),
            Message::NoCandidates => "No candidates found".to_string(),
            Message::PipelineHeader => "Recruitment pipeline".to_string(),

            // === NEWS MESSAGES ===
            Message::ArticleDrafted(title) => format!("Draft '{}' saved", title),
            Message::ArticlePublished(title) => format!("'{}' published", title),
            Message::ArticleUnpublished(title) => format!("'{}' moved back to drafts", title),
            Message::ArticleUpdated(id) => format!("Article {} updated", id),
            Message::ArticleDeleted(id) => format!("Article {} deleted", id),
            Message::ArticleNotFound(id) => format!("Article {} not found", id),
            Message::NewsHeader => "News articles".to_string(),
            Message::NoArticles => "No articles found".to_string(),

            // === EXPENSE MESSAGES ===
            Message::ExpenseAdded(amount) => format!("Expense of {} recorded", amount),
            Message::ExpenseDeleted(id) => format!("Expense {} deleted", id),
            Message::ExpenseNotFound(id) => format!("Expense {} not found", id),
            Message::ExpensesHeader(month) => format!("Expenses for {}", month),
            Message::NoExpenses(month) => format!("No expenses recorded for {}", month),
            Message::ExpenseTotal(month, total) => format!("Total for {}: {}", month, total),

            // === MEMBER MESSAGES ===
            Message::MemberAdded(email) => format!("Member {} added", email),
            Message::MemberExists(email) => format!("A member with email {} already exists", email),
            Message::MemberNotFound(id) => format!("Member {} not found", id),
            Message::MemberActivated(email) => format!("Member {} activated", email),
            Message::MemberDeactivated(email) => format!("Member {} deactivated", email),
            Message::MembersHeader => "Members".to_string(),
            Message::NoMembers => "No members registered".to_string(),
            Message::MemberRequired => "This account has no member record; pass --member to act for a member".to_string(),

            // === CALENDAR / DASHBOARD MESSAGES ===
            Message::CalendarHeader(month) => format!("Calendar for {}", month),
            Message::CalendarEmpty(month) => format!("Nothing on the calendar for {}", month),
            Message::DashboardHeader(date) => format!("Dashboard for {}", date),
            Message::UpcomingHeader => "Upcoming schedule".to_string(),
            Message::TodayAttendanceHeader => "Today's attendance".to_string(),

            // === PROMPTS ===
            Message::PromptEmail => "Email".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptPasswordConfirm => "Repeat password".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptDbUrl => "Database REST URL".to_string(),
            Message::PromptAnonKey => "Anonymous API key".to_string(),
            Message::PromptServiceKey => "Service key (leave empty to skip)".to_string(),
            Message::PromptAdminEmail => "Administrator email".to_string(),
            Message::PromptAdminName => "Administrator name".to_string(),
            Message::PromptMaxAgeHours => "Maximum session age (hours)".to_string(),
            Message::PromptIdleMinutes => "Idle timeout (minutes)".to_string(),
            Message::PromptWorkdayStart => "Workday start time (HH:MM)".to_string(),
            Message::PromptStandardHours => "Standard working hours per day".to_string(),
            Message::PromptArticleBody => "Article body".to_string(),
            Message::ConfirmDelete(what) => format!("Delete {}?", what),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::NoChangesDetected => "No changes given, nothing to update".to_string(),
        };
        write!(f, "{}", s)
    }
}
