use super::schema::COMPANY_SCHEDULES;
use crate::api::{Backend, Filter, Query};
use crate::libs::messages::Message;
use crate::libs::validation::{self, ValidationError};
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "meeting";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl Schedule {
    /// Days of `[from, to)` the event touches.
    pub fn days_within(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let first = self.start_at.date().max(from);
        let last = self.end_at.date();
        first.iter_days().take_while(|d| *d <= last && *d < to).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleInput {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_at: String,
    pub end_at: Option<String>,
    pub location: Option<String>,
}

impl ScheduleInput {
    /// An omitted end means the event ends when it starts.
    pub fn validate(&self, created_by: Option<i64>) -> Result<Schedule, ValidationError> {
        let start_at = validation::datetime("start_at", &self.start_at)?;
        let end_at = match &self.end_at {
            Some(end) => validation::not_before("end_at", start_at, validation::datetime("end_at", end)?)?,
            None => start_at,
        };
        Ok(Schedule {
            id: None,
            title: validation::required("title", &self.title)?,
            description: validation::optional(self.description.as_deref()),
            category: validation::optional(self.category.as_deref()).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            start_at,
            end_at,
            location: validation::optional(self.location.as_deref()),
            created_by,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub location: Option<String>,
}

pub struct Schedules<'a, B: Backend> {
    backend: &'a B,
}

impl<'a, B: Backend> Schedules<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub async fn add(&self, input: &ScheduleInput, created_by: Option<i64>) -> Result<Schedule> {
        let schedule = input.validate(created_by)?;
        Ok(self.backend.create(COMPANY_SCHEDULES, &schedule).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Schedule>> {
        Ok(self.backend.fetch_one(Query::table(COMPANY_SCHEDULES).filter(Filter::eq("id", id))).await?)
    }

    /// Events overlapping the month starting at `first`.
    pub async fn list_month(&self, first: NaiveDate) -> Result<Vec<Schedule>> {
        let next = validation::next_month(first);
        let query = Query::table(COMPANY_SCHEDULES)
            .filter(Filter::lt("start_at", timestamp(next)))
            .filter(Filter::gte("end_at", timestamp(first)))
            .order_asc("start_at");
        Ok(self.backend.fetch(&query).await?)
    }

    pub async fn list(&self, month: &str) -> Result<Vec<Schedule>> {
        let month = validation::month("month", month)?;
        let Some(first) = validation::first_day_of_month(&month) else {
            msg_bail_anyhow!(Message::InvalidMonth(month));
        };
        self.list_month(first).await
    }

    /// Events that have not ended yet, soonest first.
    pub async fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Result<Vec<Schedule>> {
        let query = Query::table(COMPANY_SCHEDULES)
            .filter(Filter::gte("end_at", now.format("%Y-%m-%dT%H:%M:%S").to_string()))
            .order_asc("start_at")
            .limit(limit);
        Ok(self.backend.fetch(&query).await?)
    }

    pub async fn update(&self, id: i64, edit: &ScheduleEdit) -> Result<Schedule> {
        let Some(current) = self.get(id).await? else {
            msg_bail_anyhow!(Message::ScheduleNotFound(id));
        };
        let input = ScheduleInput {
            title: edit.title.clone().unwrap_or(current.title),
            description: edit.description.clone().or(current.description),
            category: edit.category.clone().or(Some(current.category)),
            start_at: edit.start_at.clone().unwrap_or_else(|| current.start_at.to_string()),
            end_at: edit.end_at.clone().or_else(|| Some(current.end_at.to_string())),
            location: edit.location.clone().or(current.location),
        };
        let mut updated = input.validate(current.created_by)?;
        let patch = serde_json::to_value(&updated)?;
        self.backend.update(COMPANY_SCHEDULES, &[Filter::eq("id", id)], patch).await?;
        updated.id = Some(id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.backend.delete(COMPANY_SCHEDULES, &[Filter::eq("id", id)]).await? == 0 {
            msg_bail_anyhow!(Message::ScheduleNotFound(id));
        }
        Ok(())
    }
}

/// Midnight in the serialized `NaiveDateTime` form, so text comparison matches stored rows.
pub(crate) fn timestamp(date: NaiveDate) -> String {
    format!("{}T00:00:00", date)
}
