use super::app::{acting_member, confirm, current_month, local_now, visible_member, App};
use crate::db::attendance::{AttendanceEdit, AttendanceStatus};
use crate::libs::formatter::{format_duration, format_time};
use crate::libs::messages::Message;
use crate::libs::role::{Access, Manager};
use crate::libs::validation;
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    command: Option<AttendanceCommand>,
}

#[derive(Debug, Subcommand)]
enum AttendanceCommand {
    /// Start today's record
    CheckIn {
        /// present, late, remote, leave or absent; derived from the time when omitted
        #[arg(short, long)]
        status: Option<AttendanceStatus>,
        #[arg(short, long)]
        note: Option<String>,
        /// Member to check in (executives only)
        #[arg(short, long)]
        member: Option<i64>,
    },
    /// Close today's record
    CheckOut {
        /// Break taken during the day, in minutes
        #[arg(short, long = "break", default_value_t = 0)]
        break_minutes: i64,
        #[arg(short, long)]
        member: Option<i64>,
    },
    /// Records of a month
    List {
        #[arg(long)]
        month: Option<String>,
        #[arg(short, long)]
        member: Option<i64>,
    },
    /// Worked hours, overtime and status counts of a month
    Summary {
        #[arg(long)]
        month: Option<String>,
        #[arg(short, long)]
        member: Option<i64>,
    },
    /// Correct a record (executives only)
    Edit {
        id: i64,
        /// YYYY-MM-DD HH:MM
        #[arg(long)]
        check_in: Option<String>,
        /// YYYY-MM-DD HH:MM
        #[arg(long)]
        check_out: Option<String>,
        #[arg(long = "break")]
        break_minutes: Option<i64>,
        #[arg(long)]
        status: Option<AttendanceStatus>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove a record (executives only)
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: AttendanceArgs) -> Result<()> {
    let mut app = App::load()?;
    match args.command.unwrap_or(AttendanceCommand::List { month: None, member: None }) {
        AttendanceCommand::CheckIn { status, note, member } => {
            let user = app.require(Manager::Attendance, Access::Write)?;
            let member_id = acting_member(&user, member)?;
            let record = app.attendance()?.check_in(member_id, local_now(), status, note.as_deref()).await?;
            msg_success!(Message::CheckedIn(format_time(Some(&record.check_in)), record.status.to_string()));
        }
        AttendanceCommand::CheckOut { break_minutes, member } => {
            let user = app.require(Manager::Attendance, Access::Write)?;
            let member_id = acting_member(&user, member)?;
            let record = app.attendance()?.check_out(member_id, local_now(), break_minutes).await?;
            let worked = record.worked().map(|w| format_duration(&w)).unwrap_or_default();
            msg_success!(Message::CheckedOut(format_time(record.check_out.as_ref()), worked));
        }
        AttendanceCommand::List { month, member } => {
            let user = app.require(Manager::Attendance, Access::Read)?;
            let month = month.unwrap_or_else(current_month);
            let records = app.attendance()?.list(&month, visible_member(&user, member)).await?;
            if records.is_empty() {
                msg_info!(Message::NoAttendance(month));
                return Ok(());
            }
            msg_print!(Message::AttendanceHeader(month), true);
            View::attendance(&records, &app.names(&user).await?)?;
        }
        AttendanceCommand::Summary { month, member } => {
            let user = app.require(Manager::Attendance, Access::Read)?;
            let month = month.unwrap_or_else(current_month);
            let summaries = app.attendance()?.summary(&month, visible_member(&user, member)).await?;
            if summaries.is_empty() {
                msg_info!(Message::NoAttendance(month));
                return Ok(());
            }
            msg_print!(Message::AttendanceSummaryHeader(month), true);
            View::attendance_summary(&summaries, &app.names(&user).await?)?;
        }
        AttendanceCommand::Edit {
            id,
            check_in,
            check_out,
            break_minutes,
            status,
            note,
        } => {
            app.require_executive(Manager::Attendance)?;
            let edit = AttendanceEdit {
                check_in: check_in.map(|v| validation::datetime("check_in", &v)).transpose()?,
                check_out: check_out.map(|v| validation::datetime("check_out", &v)).transpose()?,
                break_minutes,
                status,
                note,
            };
            if edit.is_empty() {
                msg_info!(Message::NoChangesDetected);
                return Ok(());
            }
            app.attendance()?.update(id, &edit).await?;
            msg_success!(Message::AttendanceUpdated(id));
        }
        AttendanceCommand::Delete { id, yes } => {
            app.require_executive(Manager::Attendance)?;
            if !yes && !confirm(&format!("attendance record {}", id))? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            app.attendance()?.delete(id).await?;
            msg_success!(Message::AttendanceDeleted(id));
        }
    }
    Ok(())
}
