use super::schema::ATTENDANCE_RECORDS;
use crate::api::{Backend, Filter, Query};
use crate::libs::messages::Message;
use crate::libs::validation::{self, ValidationError};
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const MAX_BREAK_MINUTES: i64 = 600;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Remote,
    Leave,
    Absent,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Remote => "remote",
            AttendanceStatus::Leave => "leave",
            AttendanceStatus::Absent => "absent",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "remote" => Ok(AttendanceStatus::Remote),
            "leave" => Ok(AttendanceStatus::Leave),
            "absent" => Ok(AttendanceStatus::Absent),
            other => Err(format!("unknown attendance status '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub member_id: i64,
    pub work_date: NaiveDate,
    pub check_in: NaiveDateTime,
    #[serde(default)]
    pub check_out: Option<NaiveDateTime>,
    #[serde(default)]
    pub break_minutes: i64,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub note: Option<String>,
}

impl AttendanceRecord {
    /// Worked time, `None` while the member is still checked in.
    pub fn worked(&self) -> Option<Duration> {
        self.check_out.map(|out| worked_time(self.check_in, out, self.break_minutes))
    }
}

/// `check_out − check_in − break`, never negative.
pub fn worked_time(check_in: NaiveDateTime, check_out: NaiveDateTime, break_minutes: i64) -> Duration {
    (check_out - check_in - Duration::minutes(break_minutes)).max(Duration::zero())
}

pub fn overtime(worked: Duration, standard: Duration) -> Duration {
    (worked - standard).max(Duration::zero())
}

pub fn is_late(check_in: NaiveTime, start: NaiveTime) -> bool {
    check_in > start
}

/// Fields an executive may correct on an existing record.
#[derive(Debug, Clone, Default)]
pub struct AttendanceEdit {
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub break_minutes: Option<i64>,
    pub status: Option<AttendanceStatus>,
    pub note: Option<String>,
}

impl AttendanceEdit {
    pub fn is_empty(&self) -> bool {
        self.check_in.is_none()
            && self.check_out.is_none()
            && self.break_minutes.is_none()
            && self.status.is_none()
            && self.note.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSummary {
    pub member_id: i64,
    pub days: usize,
    pub late_days: usize,
    pub remote_days: usize,
    pub leave_days: usize,
    pub absent_days: usize,
    pub open_days: usize,
    pub worked: Duration,
    pub overtime: Duration,
}

/// Per-member totals over `records`, ordered by member id.
pub fn summarize(records: &[AttendanceRecord], standard: Duration) -> Vec<AttendanceSummary> {
    let mut by_member: BTreeMap<i64, AttendanceSummary> = BTreeMap::new();
    for record in records {
        let entry = by_member.entry(record.member_id).or_insert_with(|| AttendanceSummary {
            member_id: record.member_id,
            days: 0,
            late_days: 0,
            remote_days: 0,
            leave_days: 0,
            absent_days: 0,
            open_days: 0,
            worked: Duration::zero(),
            overtime: Duration::zero(),
        });
        entry.days += 1;
        match record.status {
            AttendanceStatus::Late => entry.late_days += 1,
            AttendanceStatus::Remote => entry.remote_days += 1,
            AttendanceStatus::Leave => entry.leave_days += 1,
            AttendanceStatus::Absent => entry.absent_days += 1,
            AttendanceStatus::Present => {}
        }
        match record.worked() {
            Some(worked) => {
                entry.worked = entry.worked + worked;
                entry.overtime = entry.overtime + overtime(worked, standard);
            }
            None => entry.open_days += 1,
        }
    }
    by_member.into_values().collect()
}

fn check_break(minutes: i64) -> Result<i64, ValidationError> {
    validation::in_range("break_minutes", minutes, 0, MAX_BREAK_MINUTES)
}

fn check_order(check_in: NaiveDateTime, check_out: NaiveDateTime) -> Result<(), ValidationError> {
    if check_out <= check_in {
        return Err(ValidationError::new("check_out", "must be after check-in"));
    }
    Ok(())
}

pub struct Attendance<'a, B: Backend> {
    backend: &'a B,
    start: NaiveTime,
    standard: Duration,
}

impl<'a, B: Backend> Attendance<'a, B> {
    pub fn new(backend: &'a B, start: NaiveTime, standard: Duration) -> Self {
        Self { backend, start, standard }
    }

    pub fn standard(&self) -> Duration {
        self.standard
    }

    pub async fn for_day(&self, member_id: i64, date: NaiveDate) -> Result<Option<AttendanceRecord>> {
        let query = Query::table(ATTENDANCE_RECORDS)
            .filter(Filter::eq("member_id", member_id))
            .filter(Filter::eq("work_date", date.to_string()));
        Ok(self.backend.fetch_one(query).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        Ok(self.backend.fetch_one(Query::table(ATTENDANCE_RECORDS).filter(Filter::eq("id", id))).await?)
    }

    /// Opens today's record. A second check-in on the same day is rejected.
    ///
    /// Without an explicit status the record is `late` after the workday start, `present` otherwise.
    pub async fn check_in(
        &self,
        member_id: i64,
        now: NaiveDateTime,
        status: Option<AttendanceStatus>,
        note: Option<&str>,
    ) -> Result<AttendanceRecord> {
        let date = now.date();
        if self.for_day(member_id, date).await?.is_some() {
            msg_bail_anyhow!(Message::AlreadyCheckedIn(date.to_string()));
        }
        let status = status.unwrap_or(if is_late(now.time(), self.start) {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        });
        let record = AttendanceRecord {
            id: None,
            member_id,
            work_date: date,
            check_in: now,
            check_out: None,
            break_minutes: 0,
            status,
            note: validation::optional(note),
        };
        Ok(self.backend.create(ATTENDANCE_RECORDS, &record).await?)
    }

    /// Closes today's record, or yesterday's when a shift ran past midnight
    /// and nothing was opened today.
    pub async fn check_out(&self, member_id: i64, now: NaiveDateTime, break_minutes: i64) -> Result<AttendanceRecord> {
        let date = now.date();
        let Some(mut record) = self.open_record(member_id, date).await? else {
            msg_bail_anyhow!(Message::NotCheckedIn(date.to_string()));
        };
        if record.check_out.is_some() {
            msg_bail_anyhow!(Message::AlreadyCheckedOut(record.work_date.to_string()));
        }
        let break_minutes = check_break(break_minutes)?;
        check_order(record.check_in, now)?;

        let mut patch = Map::new();
        patch.insert("check_out".to_string(), serde_json::to_value(now)?);
        patch.insert("break_minutes".to_string(), Value::from(break_minutes));
        self.write(&record, patch).await?;

        record.check_out = Some(now);
        record.break_minutes = break_minutes;
        Ok(record)
    }

    async fn open_record(&self, member_id: i64, date: NaiveDate) -> Result<Option<AttendanceRecord>> {
        if let Some(record) = self.for_day(member_id, date).await? {
            return Ok(Some(record));
        }
        let Some(previous) = date.pred_opt() else {
            return Ok(None);
        };
        Ok(self
            .for_day(member_id, previous)
            .await?
            .filter(|record| record.check_out.is_none()))
    }

    /// Records whose work date falls in `month` (`YYYY-MM`), optionally for one member.
    pub async fn list(&self, month: &str, member_id: Option<i64>) -> Result<Vec<AttendanceRecord>> {
        let month = validation::month("month", month)?;
        let Some(first) = validation::first_day_of_month(&month) else {
            msg_bail_anyhow!(Message::InvalidMonth(month));
        };
        let mut query = Query::table(ATTENDANCE_RECORDS)
            .filter(Filter::gte("work_date", first.to_string()))
            .filter(Filter::lt("work_date", validation::next_month(first).to_string()))
            .order_asc("work_date")
            .order_asc("member_id");
        if let Some(member_id) = member_id {
            query = query.filter(Filter::eq("member_id", member_id));
        }
        Ok(self.backend.fetch(&query).await?)
    }

    pub async fn list_day(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        let query = Query::table(ATTENDANCE_RECORDS)
            .filter(Filter::eq("work_date", date.to_string()))
            .order_asc("check_in");
        Ok(self.backend.fetch(&query).await?)
    }

    pub async fn update(&self, id: i64, edit: &AttendanceEdit) -> Result<AttendanceRecord> {
        let Some(mut record) = self.get(id).await? else {
            msg_bail_anyhow!(Message::AttendanceNotFound(id));
        };
        if edit.is_empty() {
            return Ok(record);
        }

        if let Some(check_in) = edit.check_in {
            record.check_in = check_in;
        }
        if let Some(check_out) = edit.check_out {
            record.check_out = Some(check_out);
        }
        if let Some(minutes) = edit.break_minutes {
            record.break_minutes = check_break(minutes)?;
        }
        if let Some(status) = edit.status {
            record.status = status;
        }
        if let Some(note) = &edit.note {
            record.note = validation::optional(Some(note));
        }
        if record.check_in.date() != record.work_date {
            return Err(ValidationError::new("check_in", "must be on the work date").into());
        }
        if let Some(check_out) = record.check_out {
            check_order(record.check_in, check_out)?;
        }

        let mut patch = Map::new();
        patch.insert("check_in".to_string(), serde_json::to_value(record.check_in)?);
        patch.insert("check_out".to_string(), serde_json::to_value(record.check_out)?);
        patch.insert("break_minutes".to_string(), Value::from(record.break_minutes));
        patch.insert("status".to_string(), serde_json::to_value(record.status)?);
        patch.insert("note".to_string(), serde_json::to_value(&record.note)?);
        self.write(&record, patch).await?;
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.backend.delete(ATTENDANCE_RECORDS, &[Filter::eq("id", id)]).await? == 0 {
            msg_bail_anyhow!(Message::AttendanceNotFound(id));
        }
        Ok(())
    }

    pub async fn summary(&self, month: &str, member_id: Option<i64>) -> Result<Vec<AttendanceSummary>> {
        Ok(summarize(&self.list(month, member_id).await?, self.standard))
    }

    async fn write(&self, record: &AttendanceRecord, patch: Map<String, Value>) -> Result<()> {
        let Some(id) = record.id else {
            msg_bail_anyhow!(Message::AttendanceNotFound(0));
        };
        self.backend.update(ATTENDANCE_RECORDS, &[Filter::eq("id", id)], Value::Object(patch)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn worked_time_subtracts_break() {
        assert_eq!(worked_time(at(9, 0), at(18, 0), 60), Duration::hours(8));
        assert_eq!(worked_time(at(9, 0), at(9, 30), 60), Duration::zero());
    }

    #[test]
    fn overtime_beyond_standard() {
        assert_eq!(overtime(Duration::minutes(570), Duration::hours(8)), Duration::minutes(90));
        assert_eq!(overtime(Duration::hours(7), Duration::hours(8)), Duration::zero());
    }

    #[test]
    fn late_is_strictly_after_start() {
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(!is_late(at(9, 0).time(), start));
        assert!(is_late(at(9, 1).time(), start));
    }

    #[test]
    fn summary_counts_statuses_and_open_days() {
        let record = |member_id, day, status, out: Option<NaiveDateTime>| AttendanceRecord {
            id: None,
            member_id,
            work_date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            check_in: NaiveDate::from_ymd_opt(2026, 10, day).unwrap().and_hms_opt(9, 0, 0).unwrap(),
            check_out: out.map(|o| NaiveDate::from_ymd_opt(2026, 10, day).unwrap().and_time(o.time())),
            break_minutes: 60,
            status,
            note: None,
        };
        let records = vec![
            record(1, 1, AttendanceStatus::Present, Some(at(19, 0))),
            record(1, 2, AttendanceStatus::Late, Some(at(18, 0))),
            record(1, 3, AttendanceStatus::Remote, None),
            record(2, 1, AttendanceStatus::Present, Some(at(17, 0))),
        ];
        let summary = summarize(&records, Duration::hours(8));
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].days, 3);
        assert_eq!(summary[0].late_days, 1);
        assert_eq!(summary[0].open_days, 1);
        assert_eq!(summary[0].worked, Duration::hours(17));
        assert_eq!(summary[0].overtime, Duration::hours(1));
        assert_eq!(summary[1].worked, Duration::hours(7));
    }
}
