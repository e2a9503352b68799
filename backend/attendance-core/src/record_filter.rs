// src/record_filter.rs
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;
use thiserror::Error;

use crate::punch_records::{
    EmployeeId, PunchField, PunchKind, PunchRecord, RawPunch, DATE_FORMAT, TIME_FORMAT,
};

// --- Error Types ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("Punch entry is not a JSON object")]
    NotAnObject,
    #[error("Mandatory field missing: {field}")]
    MissingField { field: PunchField },
    #[error("Employee id '{value}' is not an integer")]
    InvalidEmployeeId { value: String },
    #[error("Date '{value}' does not match YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("Time '{value}' does not match HH:MM:SS")]
    InvalidTime { value: String },
    #[error("Punch kind '{value}' is neither IN nor OUT")]
    InvalidKind { value: String },
}

/// A raw entry that failed validation, kept with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidRecord {
    pub index: usize,
    pub reason: InvalidReason,
    pub raw: RawPunch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidation {
    Valid(PunchRecord),
    Invalid(InvalidRecord),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub filtered_by_date: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub valid: Vec<PunchRecord>,
    pub invalid: Vec<InvalidRecord>,
    pub filtered_by_date: usize,
}

impl FilterOutcome {
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            total: self.valid.len() + self.invalid.len() + self.filtered_by_date,
            valid: self.valid.len(),
            invalid: self.invalid.len(),
            filtered_by_date: self.filtered_by_date,
        }
    }
}

// --- Validation ---

/// Validates one raw entry. `index` is its position in the raw input.
pub fn validate_record(index: usize, raw: &RawPunch) -> RecordValidation {
    match parse_record(raw) {
        Ok(record) => RecordValidation::Valid(record),
        Err(reason) => RecordValidation::Invalid(InvalidRecord {
            index,
            reason,
            raw: raw.clone(),
        }),
    }
}

/// Partitions raw entries into valid and invalid records. When `target_date`
/// is set, valid records for other days are only counted.
pub fn filter_records(raw_records: &[RawPunch], target_date: Option<NaiveDate>) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for (index, raw) in raw_records.iter().enumerate() {
        match validate_record(index, raw) {
            RecordValidation::Valid(record) => match target_date {
                Some(date) if record.date != date => outcome.filtered_by_date += 1,
                _ => outcome.valid.push(record),
            },
            RecordValidation::Invalid(invalid) => outcome.invalid.push(invalid),
        }
    }

    outcome
}

fn parse_record(raw: &RawPunch) -> Result<PunchRecord, InvalidReason> {
    let object = raw.as_object().ok_or(InvalidReason::NotAnObject)?;

    // Presence is checked for every field before any value is parsed.
    let mut values = Vec::with_capacity(PunchField::ALL.len());
    for field in PunchField::ALL {
        let value = field
            .accepted_keys()
            .iter()
            .find_map(|key| object.get(*key))
            .ok_or(InvalidReason::MissingField { field })?;
        values.push(value);
    }

    Ok(PunchRecord {
        employee_id: parse_employee_id(values[0])?,
        date: parse_date(values[1])?,
        time_of_day: parse_time(values[2])?,
        kind: parse_kind(values[3])?,
    })
}

const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn parse_employee_id(value: &Value) -> Result<EmployeeId, InvalidReason> {
    let invalid = || InvalidReason::InvalidEmployeeId {
        value: display_value(value),
    };
    match value {
        Value::Number(number) => {
            if let Some(id) = number.as_i64() {
                Ok(id)
            } else if number.is_f64() {
                // Integral floats such as 12.0 are accepted. i64::MAX as f64
                // rounds up to 2^63, so the upper bound is exclusive.
                match number.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= I64_LOWER && f < I64_UPPER => {
                        Ok(f as EmployeeId)
                    }
                    _ => Err(invalid()),
                }
            } else {
                // Unsigned values past i64::MAX.
                Err(invalid())
            }
        }
        Value::String(s) => s.trim().parse::<EmployeeId>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn parse_date(value: &Value) -> Result<NaiveDate, InvalidReason> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
        .ok_or_else(|| InvalidReason::InvalidDate {
            value: display_value(value),
        })
}

fn parse_time(value: &Value) -> Result<NaiveTime, InvalidReason> {
    value
        .as_str()
        .and_then(|s| NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).ok())
        .ok_or_else(|| InvalidReason::InvalidTime {
            value: display_value(value),
        })
}

fn parse_kind(value: &Value) -> Result<PunchKind, InvalidReason> {
    value
        .as_str()
        .and_then(PunchKind::parse)
        .ok_or_else(|| InvalidReason::InvalidKind {
            value: display_value(value),
        })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
