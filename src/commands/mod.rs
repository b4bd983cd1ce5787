pub mod app;
pub mod attendance;
pub mod calendar;
pub mod dashboard;
pub mod expense;
pub mod init;
pub mod kpi;
pub mod login;
pub mod logout;
pub mod member;
pub mod news;
pub mod password;
pub mod recruit;
pub mod schedule;
pub mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Sign in with email and password")]
    Login(login::LoginArgs),
    #[command(about = "Sign out and discard the stored session")]
    Logout,
    #[command(about = "Inspect or keep alive the current session")]
    Session(session::SessionArgs),
    #[command(about = "Print an Argon2 hash for a password")]
    HashPassword,
    #[command(about = "Check in, check out and review attendance")]
    Attendance(attendance::AttendanceArgs),
    #[command(about = "Company events and meetings")]
    Schedule(schedule::ScheduleArgs),
    #[command(about = "KPI indicators, targets and progress")]
    Kpi(kpi::KpiArgs),
    #[command(about = "Recruitment pipeline")]
    Recruit(recruit::RecruitArgs),
    #[command(about = "Company news")]
    News(news::NewsArgs),
    #[command(about = "Monthly expenses")]
    Expense(expense::ExpenseArgs),
    #[command(about = "Members and their access")]
    Member(member::MemberArgs),
    #[command(about = "Month calendar of events, interviews and attendance")]
    Calendar(calendar::CalendarArgs),
    #[command(about = "KPI standings, today's attendance and upcoming events")]
    Dashboard,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Login(args) => login::cmd(args).await,
            Commands::Logout => logout::cmd(),
            Commands::Session(args) => session::cmd(args).await,
            Commands::HashPassword => password::cmd(),
            Commands::Attendance(args) => attendance::cmd(args).await,
            Commands::Schedule(args) => schedule::cmd(args).await,
            Commands::Kpi(args) => kpi::cmd(args).await,
            Commands::Recruit(args) => recruit::cmd(args).await,
            Commands::News(args) => news::cmd(args).await,
            Commands::Expense(args) => expense::cmd(args).await,
            Commands::Member(args) => member::cmd(args).await,
            Commands::Calendar(args) => calendar::cmd(args).await,
            Commands::Dashboard => dashboard::cmd().await,
        }
    }
}
