//! Month calendar merging schedules, interviews and attendance.

use crate::api::{Backend, Filter, Query};
use crate::db::attendance::AttendanceRecord;
use crate::db::recruitment::{Candidate, Recruitment};
use crate::db::schedules::{Schedule, Schedules};
use crate::db::schema::ATTENDANCE_RECORDS;
use crate::libs::formatter::{format_time, member_name};
use crate::libs::messages::Message;
use crate::libs::validation;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Schedule,
    Interview,
    Attendance,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Schedule => write!(f, "schedule"),
            EntryKind::Interview => write!(f, "interview"),
            EntryKind::Attendance => write!(f, "attendance"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    /// `None` for entries covering the whole day.
    pub time: Option<NaiveTime>,
    pub kind: EntryKind,
    pub title: String,
    pub detail: Option<String>,
}

pub type MonthCalendar = BTreeMap<NaiveDate, Vec<CalendarEntry>>;

/// Day-indexed entries of the month starting at `first`; within a day,
/// whole-day entries come first, then by time.
pub fn build_month(
    first: NaiveDate,
    schedules: &[Schedule],
    interviews: &[Candidate],
    attendance: &[AttendanceRecord],
    names: &HashMap<i64, String>,
) -> MonthCalendar {
    let next = validation::next_month(first);
    let mut days: MonthCalendar = BTreeMap::new();

    for schedule in schedules {
        for day in schedule.days_within(first, next) {
            let starts_today = day == schedule.start_at.date();
            days.entry(day).or_default().push(CalendarEntry {
                date: day,
                time: starts_today.then(|| schedule.start_at.time()),
                kind: EntryKind::Schedule,
                title: schedule.title.clone(),
                detail: schedule.location.clone(),
            });
        }
    }

    for candidate in interviews {
        let Some(at) = candidate.interview_at else {
            continue;
        };
        if at.date() < first || at.date() >= next {
            continue;
        }
        days.entry(at.date()).or_default().push(CalendarEntry {
            date: at.date(),
            time: Some(at.time()),
            kind: EntryKind::Interview,
            title: format!("{} ({})", candidate.candidate_name, candidate.position),
            detail: candidate.interviewer.clone(),
        });
    }

    for record in attendance {
        if record.work_date < first || record.work_date >= next {
            continue;
        }
        days.entry(record.work_date).or_default().push(CalendarEntry {
            date: record.work_date,
            time: Some(record.check_in.time()),
            kind: EntryKind::Attendance,
            title: format!("{}: {}", member_name(names, record.member_id), record.status),
            detail: Some(format!(
                "{} - {}",
                format_time(Some(&record.check_in)),
                format_time(record.check_out.as_ref())
            )),
        });
    }

    for entries in days.values_mut() {
        entries.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.kind.cmp(&b.kind)));
    }
    days
}

/// Loads and merges one month. Interviews are left out unless asked for;
/// attendance is limited to `member_id` when given.
pub async fn load_month<B: Backend>(
    backend: &B,
    month: &str,
    member_id: Option<i64>,
    with_interviews: bool,
    names: &HashMap<i64, String>,
) -> Result<MonthCalendar> {
    let month = validation::month("month", month)?;
    let Some(first) = validation::first_day_of_month(&month) else {
        msg_bail_anyhow!(Message::InvalidMonth(month));
    };
    let next = validation::next_month(first);

    let schedules = Schedules::new(backend).list_month(first).await?;
    let interviews = if with_interviews {
        Recruitment::new(backend).interviews_between(first, next).await?
    } else {
        Vec::new()
    };
    let mut query = Query::table(ATTENDANCE_RECORDS)
        .filter(Filter::gte("work_date", first.to_string()))
        .filter(Filter::lt("work_date", next.to_string()));
    if let Some(member_id) = member_id {
        query = query.filter(Filter::eq("member_id", member_id));
    }
    let attendance: Vec<AttendanceRecord> = backend.fetch(&query).await?;

    Ok(build_month(first, &schedules, &interviews, &attendance, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::attendance::AttendanceStatus;
    use crate::db::recruitment::Stage;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn entries_are_grouped_per_day_in_time_order() {
        let schedule = Schedule {
            id: Some(1),
            title: "Offsite".to_string(),
            description: None,
            category: "event".to_string(),
            start_at: date(5).and_hms_opt(13, 0, 0).unwrap(),
            end_at: date(6).and_hms_opt(12, 0, 0).unwrap(),
            location: Some("Lisbon".to_string()),
            created_by: None,
        };
        let candidate = Candidate {
            id: Some(2),
            candidate_name: "Ana".to_string(),
            email: None,
            position: "Engineer".to_string(),
            stage: Stage::Interview,
            interview_at: Some(date(5).and_hms_opt(10, 0, 0).unwrap()),
            interviewer: None,
            rating: None,
            notes: None,
            created_at: Utc::now(),
        };
        let record = AttendanceRecord {
            id: Some(3),
            member_id: 7,
            work_date: date(6),
            check_in: date(6).and_hms_opt(8, 55, 0).unwrap(),
            check_out: None,
            break_minutes: 0,
            status: AttendanceStatus::Present,
            note: None,
        };
        let names = HashMap::from([(7, "Kim".to_string())]);

        let calendar = build_month(date(1), &[schedule], &[candidate], &[record], &names);
        assert_eq!(calendar.len(), 2);

        let fifth = &calendar[&date(5)];
        assert_eq!(fifth[0].kind, EntryKind::Interview);
        assert_eq!(fifth[1].kind, EntryKind::Schedule);

        let sixth = &calendar[&date(6)];
        assert_eq!(sixth[0].kind, EntryKind::Schedule);
        assert_eq!(sixth[0].time, None);
        assert_eq!(sixth[1].title, "Kim: present");
    }
}
