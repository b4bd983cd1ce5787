//! KPI indicators, per-member monthly targets and progress records.
//!
//! Progress is append-only: recording it is a single insert, and a target's
//! current value is always derived as the sum of its progress records.

use super::schema::{KPI_INDICATORS, KPI_PROGRESS_RECORDS, KPI_TARGETS};
use crate::api::{Backend, Filter, Query};
use crate::libs::messages::Message;
use crate::libs::validation;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Indicator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub unit: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub indicator_id: i64,
    pub member_id: i64,
    pub period: String,
    pub target_value: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProgressRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub target_id: i64,
    pub value: f64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<i64>,
    pub recorded_at: DateTime<Utc>,
}

/// One target with its derived progress.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiOverviewRow {
    pub target_id: i64,
    pub indicator: String,
    pub unit: String,
    pub category: String,
    pub member_id: i64,
    pub period: String,
    pub target_value: f64,
    pub current: f64,
    pub rate: f64,
}

/// `current / target × 100`, rounded to one decimal. Zero targets yield zero.
pub fn achievement_rate(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target * 1000.0).round() / 10.0
}

/// Joins targets with their indicator and summed progress, best rate first.
pub fn build_overview(indicators: &[Indicator], targets: &[Target], progress: &[ProgressRecord]) -> Vec<KpiOverviewRow> {
    let indicators: HashMap<i64, &Indicator> = indicators.iter().filter_map(|i| i.id.map(|id| (id, i))).collect();
    let mut totals: HashMap<i64, f64> = HashMap::new();
    for record in progress {
        *totals.entry(record.target_id).or_default() += record.value;
    }

    let mut rows: Vec<KpiOverviewRow> = targets
        .iter()
        .filter_map(|target| {
            let id = target.id?;
            let indicator = indicators.get(&target.indicator_id);
            let current = totals.get(&id).copied().unwrap_or_default();
            Some(KpiOverviewRow {
                target_id: id,
                indicator: indicator.map(|i| i.name.clone()).unwrap_or_else(|| format!("#{}", target.indicator_id)),
                unit: indicator.map(|i| i.unit.clone()).unwrap_or_default(),
                category: indicator.map(|i| i.category.clone()).unwrap_or_default(),
                member_id: target.member_id,
                period: target.period.clone(),
                target_value: target.target_value,
                current,
                rate: achievement_rate(current, target.target_value),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.rate
            .total_cmp(&a.rate)
            .then_with(|| a.indicator.cmp(&b.indicator))
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
    rows
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorInput {
    pub name: String,
    pub unit: String,
    pub category: String,
    pub description: Option<String>,
}

pub struct Kpi<'a, B: Backend> {
    backend: &'a B,
}

impl<'a, B: Backend> Kpi<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub async fn add_indicator(&self, input: &IndicatorInput) -> Result<Indicator> {
        let indicator = Indicator {
            id: None,
            name: validation::required("name", &input.name)?,
            unit: validation::required("unit", &input.unit)?,
            category: validation::required("category", &input.category)?,
            description: validation::optional(input.description.as_deref()),
        };
        Ok(self.backend.create(KPI_INDICATORS, &indicator).await?)
    }

    pub async fn indicators(&self) -> Result<Vec<Indicator>> {
        Ok(self.backend.fetch(&Query::table(KPI_INDICATORS).order_asc("category").order_asc("name")).await?)
    }

    pub async fn indicator(&self, id: i64) -> Result<Option<Indicator>> {
        Ok(self.backend.fetch_one(Query::table(KPI_INDICATORS).filter(Filter::eq("id", id))).await?)
    }

    /// Refuses while any target still references the indicator.
    pub async fn delete_indicator(&self, id: i64) -> Result<()> {
        let in_use: Option<Target> = self.backend.fetch_one(Query::table(KPI_TARGETS).filter(Filter::eq("indicator_id", id))).await?;
        if in_use.is_some() {
            msg_bail_anyhow!(Message::IndicatorInUse(id));
        }
        if self.backend.delete(KPI_INDICATORS, &[Filter::eq("id", id)]).await? == 0 {
            msg_bail_anyhow!(Message::IndicatorNotFound(id));
        }
        Ok(())
    }

    /// Creates or replaces the target for one indicator, member and period.
    pub async fn set_target(&self, indicator_id: i64, member_id: i64, period: &str, target_value: f64) -> Result<Target> {
        let period = validation::month("period", period)?;
        let target_value = validation::positive("target_value", target_value)?;
        if self.indicator(indicator_id).await?.is_none() {
            msg_bail_anyhow!(Message::IndicatorNotFound(indicator_id));
        }

        let key = [
            Filter::eq("indicator_id", indicator_id),
            Filter::eq("member_id", member_id),
            Filter::eq("period", period.as_str()),
        ];
        let existing: Option<Target> = self.backend.fetch_one(Query::table(KPI_TARGETS).filters(key.to_vec())).await?;
        match existing {
            Some(mut target) => {
                self.backend.update(KPI_TARGETS, &key, json!({ "target_value": target_value })).await?;
                target.target_value = target_value;
                Ok(target)
            }
            None => {
                let target = Target {
                    id: None,
                    indicator_id,
                    member_id,
                    period,
                    target_value,
                };
                Ok(self.backend.create(KPI_TARGETS, &target).await?)
            }
        }
    }

    pub async fn target(&self, id: i64) -> Result<Option<Target>> {
        Ok(self.backend.fetch_one(Query::table(KPI_TARGETS).filter(Filter::eq("id", id))).await?)
    }

    pub async fn targets(&self, period: &str, member_id: Option<i64>) -> Result<Vec<Target>> {
        let period = validation::month("period", period)?;
        let mut query = Query::table(KPI_TARGETS).filter(Filter::eq("period", period)).order_asc("member_id");
        if let Some(member_id) = member_id {
            query = query.filter(Filter::eq("member_id", member_id));
        }
        Ok(self.backend.fetch(&query).await?)
    }

    /// Deleting a target removes its progress records with it.
    ///
    /// One delete: `kpi_progress_records.target_id` is declared
    /// `ON DELETE CASCADE`, locally and in the hosted schema.
    pub async fn delete_target(&self, id: i64) -> Result<()> {
        if self.backend.delete(KPI_TARGETS, &[Filter::eq("id", id)]).await? == 0 {
            msg_bail_anyhow!(Message::TargetNotFound(id));
        }
        Ok(())
    }

    /// Appends a progress record and returns the target's new achievement rate.
    pub async fn record_progress(
        &self,
        target_id: i64,
        value: f64,
        note: Option<&str>,
        recorded_by: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(ProgressRecord, f64)> {
        let value = validation::non_negative("value", value)?;
        let Some(target) = self.target(target_id).await? else {
            msg_bail_anyhow!(Message::TargetNotFound(target_id));
        };
        let record = ProgressRecord {
            id: None,
            target_id,
            value,
            note: validation::optional(note),
            recorded_by,
            recorded_at: now,
        };
        let stored: ProgressRecord = self.backend.create(KPI_PROGRESS_RECORDS, &record).await?;

        let current: f64 = self.progress(target_id).await?.iter().map(|p| p.value).sum();
        Ok((stored, achievement_rate(current, target.target_value)))
    }

    pub async fn progress(&self, target_id: i64) -> Result<Vec<ProgressRecord>> {
        let query = Query::table(KPI_PROGRESS_RECORDS)
            .filter(Filter::eq("target_id", target_id))
            .order_asc("recorded_at");
        Ok(self.backend.fetch(&query).await?)
    }

    pub async fn overview(&self, period: &str, member_id: Option<i64>) -> Result<Vec<KpiOverviewRow>> {
        let targets = self.targets(period, member_id).await?;
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = targets.iter().filter_map(|t| t.id).collect();
        let progress: Vec<ProgressRecord> = self
            .backend
            .fetch(&Query::table(KPI_PROGRESS_RECORDS).filter(Filter::is_in("target_id", ids)))
            .await?;
        let indicators = self.indicators().await?;
        Ok(build_overview(&indicators, &targets, &progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rounds_to_one_decimal() {
        assert_eq!(achievement_rate(1.0, 3.0), 33.3);
        assert_eq!(achievement_rate(2.0, 3.0), 66.7);
        assert_eq!(achievement_rate(150.0, 100.0), 150.0);
        assert_eq!(achievement_rate(5.0, 0.0), 0.0);
    }

    #[test]
    fn overview_sums_progress_and_sorts_by_rate() {
        let indicators = vec![Indicator {
            id: Some(1),
            name: "Deals closed".to_string(),
            unit: "count".to_string(),
            category: "sales".to_string(),
            description: None,
        }];
        let target = |id, member_id, value| Target {
            id: Some(id),
            indicator_id: 1,
            member_id,
            period: "2026-10".to_string(),
            target_value: value,
        };
        let progress = |target_id, value| ProgressRecord {
            id: None,
            target_id,
            value,
            note: None,
            recorded_by: None,
            recorded_at: Utc::now(),
        };
        let rows = build_overview(
            &indicators,
            &[target(10, 1, 10.0), target(11, 2, 4.0)],
            &[progress(10, 2.0), progress(10, 1.0), progress(11, 3.0)],
        );
        assert_eq!(rows[0].target_id, 11);
        assert_eq!(rows[0].rate, 75.0);
        assert_eq!(rows[1].current, 3.0);
        assert_eq!(rows[1].rate, 30.0);
        assert_eq!(rows[1].indicator, "Deals closed");
    }
}
