//! Text formatting for table cells and console messages.

use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;

/// `HH:MM`, negative durations shown as `00:00`.
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Trims trailing zeros so `12.0` prints as `12` and `2.5` as `2.5`.
pub fn format_value(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_datetime(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_time(at: Option<&NaiveDateTime>) -> String {
    at.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| "-".to_string())
}

/// Display name for a member id, `#id` when the name is unknown.
pub fn member_name(names: &HashMap<i64, String>, id: i64) -> String {
    names.get(&id).cloned().unwrap_or_else(|| format!("#{}", id))
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
