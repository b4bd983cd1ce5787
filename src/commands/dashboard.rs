use super::app::{local_now, visible_member, App};
use crate::libs::dashboard;
use crate::libs::messages::Message;
use crate::libs::role::{Access, Manager};
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let mut app = App::load()?;
    let user = app.require(Manager::Dashboard, Access::Read)?;
    let now = local_now();
    let names = app.names(&user).await?;
    let attendance = app.attendance()?;
    let board = dashboard::load(app.db(), &attendance, now, visible_member(&user, None)).await?;

    msg_print!(Message::DashboardHeader(now.format("%Y-%m-%d").to_string()), true);

    msg_print!(Message::KpiOverviewHeader(board.period.clone()));
    if board.kpi.is_empty() {
        msg_info!(Message::NoTargets(board.period.clone()));
    } else {
        View::kpi_overview(&board.kpi, &names)?;
    }

    msg_print!(Message::TodayAttendanceHeader, true);
    if board.today.is_empty() {
        msg_info!(Message::NoAttendance(now.format("%Y-%m-%d").to_string()));
    } else {
        View::attendance(&board.today, &names)?;
    }

    msg_print!(Message::UpcomingHeader, true);
    if board.upcoming.is_empty() {
        msg_info!(Message::NoSchedules(board.period));
    } else {
        View::schedules(&board.upcoming)?;
    }
    Ok(())
}
