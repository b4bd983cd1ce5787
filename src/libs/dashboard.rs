//! Start-of-day overview: KPI standings, today's attendance and what is coming up.

use crate::api::Backend;
use crate::db::attendance::{Attendance, AttendanceRecord};
use crate::db::kpi::{Kpi, KpiOverviewRow};
use crate::db::schedules::{Schedule, Schedules};
use anyhow::Result;
use chrono::NaiveDateTime;

pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub period: String,
    pub kpi: Vec<KpiOverviewRow>,
    pub today: Vec<AttendanceRecord>,
    pub upcoming: Vec<Schedule>,
}

/// Company-wide when `member_id` is `None`, otherwise limited to that member.
pub async fn load<B: Backend>(
    backend: &B,
    attendance: &Attendance<'_, B>,
    now: NaiveDateTime,
    member_id: Option<i64>,
) -> Result<Dashboard> {
    let period = now.format("%Y-%m").to_string();
    let kpi = Kpi::new(backend).overview(&period, member_id).await?;

    let mut today = attendance.list_day(now.date()).await?;
    if let Some(member_id) = member_id {
        today.retain(|r| r.member_id == member_id);
    }

    let upcoming = Schedules::new(backend).upcoming(now, UPCOMING_LIMIT).await?;

    Ok(Dashboard {
        period,
        kpi,
        today,
        upcoming,
    })
}
