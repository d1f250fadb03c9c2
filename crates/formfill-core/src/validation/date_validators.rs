//! Date and date-range validators
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use chrono::NaiveDate;
use serde_json::Value;

use super::types::{FieldResult, FieldValidator};
use crate::dates::{calculate_gap, display_date, parse_calendar_date, resolve_date_limit, Clock};
use crate::types::{DateField, DateLimit, DateRangeField};

fn too_early(min: NaiveDate) -> String {
    format!(
        "The selected date is too early. Please choose a date on or after {}.",
        display_date(min)
    )
}

fn too_late(max: NaiveDate) -> String {
    format!(
        "The selected date is too late. Please choose a date on or before {}.",
        display_date(max)
    )
}

fn days(count: f64) -> String {
    if count == 1.0 {
        format!("{} day", count)
    } else {
        format!("{} days", count)
    }
}

/// Reject days outside the resolved `[min, max]` window
fn check_bounds(
    start: NaiveDate,
    end: NaiveDate,
    min: &DateLimit,
    max: &DateLimit,
    clock: &dyn Clock,
) -> FieldResult {
    if let Some(min) = resolve_date_limit(min, clock) {
        if start < min {
            return Err(too_early(min));
        }
    }

    if let Some(max) = resolve_date_limit(max, clock) {
        if end > max {
            return Err(too_late(max));
        }
    }

    Ok(())
}

/// Single calendar date
#[derive(Debug, Clone, Copy)]
pub struct DateValidator<'a> {
    field: &'a DateField,
    clock: &'a dyn Clock,
}

impl<'a> DateValidator<'a> {
    pub fn new(field: &'a DateField, clock: &'a dyn Clock) -> Self {
        Self { field, clock }
    }
}

impl FieldValidator for DateValidator<'_> {
    fn validate(&self, value: &Value) -> FieldResult {
        let date = value
            .as_str()
            .and_then(parse_calendar_date)
            .ok_or_else(|| "Please pick a valid date.".to_string())?;

        check_bounds(
            date,
            date,
            &self.field.min_date,
            &self.field.max_date,
            self.clock,
        )
    }
}

/// Two-element `[start, end]` range
#[derive(Debug, Clone, Copy)]
pub struct DateRangeValidator<'a> {
    field: &'a DateRangeField,
    clock: &'a dyn Clock,
}

impl<'a> DateRangeValidator<'a> {
    pub fn new(field: &'a DateRangeField, clock: &'a dyn Clock) -> Self {
        Self { field, clock }
    }

    fn check_gap(&self, start: NaiveDate, end: NaiveDate) -> FieldResult {
        let Some(gap) = self.field.gap_in_days else {
            return Ok(());
        };
        let span = calculate_gap(start, end) as f64;

        if let Some(min) = gap.min.filter(|min| *min > 0.0) {
            if span < min {
                return Err(format!("Please select a range of at least {}.", days(min)));
            }
        }

        if let Some(max) = gap.max.filter(|max| *max > 0.0) {
            if span > max {
                return Err(format!(
                    "The selected range is too long. Please choose up to {}.",
                    days(max)
                ));
            }
        }

        Ok(())
    }
}

impl FieldValidator for DateRangeValidator<'_> {
    fn validate(&self, value: &Value) -> FieldResult {
        let bounds = value
            .as_array()
            .filter(|pair| pair.len() == 2)
            .ok_or_else(|| "Please select a valid start and end date.".to_string())?;

        let parse = |raw: &Value| raw.as_str().and_then(parse_calendar_date);
        let (start, end) = match (parse(&bounds[0]), parse(&bounds[1])) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err("Please select valid dates.".to_string()),
        };

        if start > end {
            return Err("The start date cannot be after the end date.".to_string());
        }

        check_bounds(
            start,
            end,
            &self.field.min_date,
            &self.field.max_date,
            self.clock,
        )?;

        self.check_gap(start, end)
    }
}
