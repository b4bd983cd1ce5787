use super::app::{confirm, current_month, App};
use crate::db::schedules::{ScheduleEdit, ScheduleInput, Schedules};
use crate::libs::messages::Message;
use crate::libs::role::{Access, Manager};
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    command: Option<ScheduleCommand>,
}

#[derive(Debug, Subcommand)]
enum ScheduleCommand {
    /// Events of a month
    List {
        #[arg(long)]
        month: Option<String>,
    },
    /// Add a company event
    Add {
        title: String,
        /// YYYY-MM-DD HH:MM
        #[arg(short, long)]
        start: String,
        /// YYYY-MM-DD HH:MM; defaults to the start
        #[arg(short, long)]
        end: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change an event
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove an event
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: ScheduleArgs) -> Result<()> {
    let mut app = App::load()?;
    match args.command.unwrap_or(ScheduleCommand::List { month: None }) {
        ScheduleCommand::List { month } => {
            app.require(Manager::Schedule, Access::Read)?;
            let month = month.unwrap_or_else(current_month);
            let schedules = Schedules::new(app.db()).list(&month).await?;
            if schedules.is_empty() {
                msg_info!(Message::NoSchedules(month));
                return Ok(());
            }
            msg_print!(Message::SchedulesHeader(month), true);
            View::schedules(&schedules)?;
        }
        ScheduleCommand::Add {
            title,
            start,
            end,
            category,
            location,
            description,
        } => {
            let user = app.require(Manager::Schedule, Access::Write)?;
            let input = ScheduleInput {
                title,
                description,
                category,
                start_at: start,
                end_at: end,
                location,
            };
            let schedule = Schedules::new(app.db()).add(&input, user.member_id()).await?;
            msg_success!(Message::ScheduleAdded(schedule.title));
        }
        ScheduleCommand::Edit {
            id,
            title,
            start,
            end,
            category,
            location,
            description,
        } => {
            app.require(Manager::Schedule, Access::Write)?;
            let edit = ScheduleEdit {
                title,
                description,
                category,
                start_at: start,
                end_at: end,
                location,
            };
            Schedules::new(app.db()).update(id, &edit).await?;
            msg_success!(Message::ScheduleUpdated(id));
        }
        ScheduleCommand::Delete { id, yes } => {
            app.require(Manager::Schedule, Access::Write)?;
            if !yes && !confirm(&format!("schedule {}", id))? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            Schedules::new(app.db()).delete(id).await?;
            msg_success!(Message::ScheduleDeleted(id));
        }
    }
    Ok(())
}
