use super::app::{current_month, visible_member, App};
use crate::libs::calendar::load_month;
use crate::libs::messages::Message;
use crate::libs::role::{Access, Manager};
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// YYYY-MM, the current month when omitted
    #[arg(long)]
    month: Option<String>,
    /// Only this member's attendance (executives only)
    #[arg(short, long)]
    member: Option<i64>,
}

pub async fn cmd(args: CalendarArgs) -> Result<()> {
    let mut app = App::load()?;
    let user = app.require(Manager::Calendar, Access::Read)?;
    let month = args.month.unwrap_or_else(current_month);
    let names = app.names(&user).await?;

    // Interviews are visible to executives only.
    let calendar = load_month(
        app.db(),
        &month,
        visible_member(&user, args.member),
        user.role.is_executive(),
        &names,
    )
    .await?;
    if calendar.is_empty() {
        msg_info!(Message::CalendarEmpty(month));
        return Ok(());
    }

    msg_print!(Message::CalendarHeader(month), true);
    View::calendar(&calendar)?;
    Ok(())
}
