//! Submission-time checks shared by the data managers.
//!
//! Nothing here touches the database: each helper either returns the
//! cleaned-up value or a [`ValidationError`] naming the offending field.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub type Validated<T> = Result<T, ValidationError>;

/// Trims the value and rejects it when nothing is left.
pub fn required(field: &'static str, value: &str) -> Validated<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Trims optional text; blank becomes `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn in_range<T: PartialOrd + Display + Copy>(field: &'static str, value: T, min: T, max: T) -> Validated<T> {
    if value < min || value > max {
        return Err(ValidationError::new(field, format!("must be between {} and {}", min, max)));
    }
    Ok(value)
}

pub fn positive(field: &'static str, value: f64) -> Validated<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new(field, "must be greater than zero"));
    }
    Ok(value)
}

pub fn non_negative(field: &'static str, value: f64) -> Validated<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(value)
}

pub fn email(value: &str) -> Validated<String> {
    let email = required("email", value)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => Ok(email),
        _ => Err(ValidationError::new("email", "is not a valid address")),
    }
}

/// Accepts `YYYY-MM` and returns it normalized.
pub fn month(field: &'static str, value: &str) -> Validated<String> {
    first_day_of_month(value)
        .map(|d| d.format("%Y-%m").to_string())
        .ok_or_else(|| ValidationError::new(field, "must look like YYYY-MM"))
}

pub fn first_day_of_month(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").ok()
}

/// First day of the month after the one containing `date`.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 { (date.year() + 1, 1) } else { (date.year(), date.month() + 1) };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

pub fn date(field: &'static str, value: &str) -> Validated<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::new(field, "must look like YYYY-MM-DD"))
}

/// Accepts `YYYY-MM-DD HH:MM` or `YYYY-MM-DDTHH:MM[:SS]`.
pub fn datetime(field: &'static str, value: &str) -> Validated<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| ValidationError::new(field, "must look like YYYY-MM-DD HH:MM"))
}

pub fn not_before(field: &'static str, start: NaiveDateTime, end: NaiveDateTime) -> Validated<NaiveDateTime> {
    if end < start {
        return Err(ValidationError::new(field, "must not be before the start"));
    }
    Ok(end)
}
