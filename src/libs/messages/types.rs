#[derive(Debug, Clone)]
pub enum Message {
    // === SESSION MESSAGES ===
    LoginSucceeded(String, String), // name, role
    LoginFailed,
    LoggedOut,
    NotLoggedIn,
    SessionExpired,
    SessionEndedElsewhere,
    SessionDiscarded,
    SessionStatus {
        name: String,
        email: String,
        role: String,
        expires_at: String,
        idle_for: String,
    },
    AccessDenied(String), // manager
    WatchStarted(u64),    // check interval in seconds
    WatchStopped,
    WatchInputClosed,
    ActivityRecorded(String), // time

    // === AUTHENTICATION MESSAGES ===
    CredentialCheckFailed(String), // error
    LoginBookkeepingFailed(String), // error
    ElevatedClientMissing,
    PasswordHash(String),
    PasswordsDoNotMatch,
    PasswordHashFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleDatabase,
    ConfigModuleAdmin,
    ConfigModuleSession,
    ConfigModuleWorkday,
    UsingLocalDatabase(String), // path
    UsingHostedDatabase(String), // url
    InvalidWorkdayStart(String),

    // === DATABASE MESSAGES ===
    DbRequestFailed(String),
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,

    // === VALIDATION MESSAGES ===
    ValidationFailed(String),
    InvalidMonth(String),
    InvalidDate(String),
    InvalidTime(String),

    // === ATTENDANCE MESSAGES ===
    CheckedIn(String, String), // time, status
    CheckedOut(String, String), // time, worked
    AlreadyCheckedIn(String),  // date
    NotCheckedIn(String),      // date
    AlreadyCheckedOut(String), // date
    AttendanceUpdated(i64),
    AttendanceDeleted(i64),
    AttendanceNotFound(i64),
    AttendanceHeader(String), // month
    NoAttendance(String),     // month
    AttendanceSummaryHeader(String),

    // === SCHEDULE MESSAGES ===
    ScheduleAdded(String),
    ScheduleUpdated(i64),
    ScheduleDeleted(i64),
    ScheduleNotFound(i64),
    SchedulesHeader(String),
    NoSchedules(String),

    // === KPI MESSAGES ===
    IndicatorAdded(String),
    IndicatorDeleted(i64),
    IndicatorNotFound(i64),
    IndicatorInUse(i64),
    IndicatorsHeader,
    NoIndicators,
    TargetSaved(String, String), // indicator, period
    TargetNotFound(i64),
    TargetDeleted(i64),
    TargetsHeader(String),
    NoTargets(String),
    ProgressRecorded(String), // achievement rate
    ProgressHeader(i64),
    NoProgress(i64),
    KpiOverviewHeader(String),

    // === RECRUITMENT MESSAGES ===
    CandidateAdded(String),
    CandidateNotFound(i64),
    StageChanged(String, String), // candidate, stage
    InvalidStageTransition(String, String),
    CandidateRated(String, u8),
    InterviewScheduled(String, String), // candidate, time
    CandidateDeleted(i64),
    CandidatesHeader,
    NoCandidates,
    PipelineHeader,

    // === NEWS MESSAGES ===
    ArticleDrafted(String),
    ArticlePublished(String),
    ArticleUnpublished(String),
    ArticleUpdated(i64),
    ArticleDeleted(i64),
    ArticleNotFound(i64),
    NewsHeader,
    NoArticles,

    // === EXPENSE MESSAGES ===
    ExpenseAdded(String),
    ExpenseDeleted(i64),
    ExpenseNotFound(i64),
    ExpensesHeader(String),
    NoExpenses(String),
    ExpenseTotal(String, String), // month, total

    // === MEMBER MESSAGES ===
    MemberAdded(String),
    MemberExists(String),
    MemberNotFound(i64),
    MemberActivated(String),
    MemberDeactivated(String),
    MembersHeader,
    NoMembers,
    MemberRequired,

    // === CALENDAR / DASHBOARD MESSAGES ===
    CalendarHeader(String),
    CalendarEmpty(String),
    DashboardHeader(String),
    UpcomingHeader,
    TodayAttendanceHeader,

    // === PROMPTS ===
    PromptEmail,
    PromptPassword,
    PromptPasswordConfirm,
    PromptSelectModules,
    PromptDbUrl,
    PromptAnonKey,
    PromptServiceKey,
    PromptAdminEmail,
    PromptAdminName,
    PromptMaxAgeHours,
    PromptIdleMinutes,
    PromptWorkdayStart,
    PromptStandardHours,
    PromptArticleBody,
    ConfirmDelete(String),

    // === GENERAL MESSAGES ===
    OperationCancelled,
    NoChangesDetected,
}
