// src/punch_records.rs
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::fmt;

// --- Core Data Structures ---

pub type EmployeeId = i64;

/// Raw punch entry as it arrives from the time-clock export.
pub type RawPunch = serde_json::Value;

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Roster entry. Extra fields in the roster payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
}

impl Employee {
    pub fn new(id: EmployeeId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunchKind {
    In,
    Out,
}

impl PunchKind {
    /// Accepts `IN` / `OUT` in any case, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("IN") {
            Some(PunchKind::In)
        } else if value.eq_ignore_ascii_case("OUT") {
            Some(PunchKind::Out)
        } else {
            None
        }
    }
}

impl fmt::Display for PunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PunchKind::In => f.write_str("IN"),
            PunchKind::Out => f.write_str("OUT"),
        }
    }
}

/// A validated, normalized clock event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunchRecord {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub time_of_day: NaiveTime,
    pub kind: PunchKind,
}

impl PunchRecord {
    pub fn new(
        employee_id: EmployeeId,
        date: NaiveDate,
        time_of_day: NaiveTime,
        kind: PunchKind,
    ) -> Self {
        Self {
            employee_id,
            date,
            time_of_day,
            kind,
        }
    }
}

// --- Raw field names ---

/// Fields every raw punch must carry. Each field accepts the English key and
/// the key used by the legacy time-clock export; the first key present wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchField {
    EmployeeId,
    Date,
    TimeOfDay,
    Kind,
}

impl PunchField {
    pub const ALL: [PunchField; 4] = [
        PunchField::EmployeeId,
        PunchField::Date,
        PunchField::TimeOfDay,
        PunchField::Kind,
    ];

    pub fn accepted_keys(self) -> &'static [&'static str] {
        match self {
            PunchField::EmployeeId => &["employee_id", "cedula"],
            PunchField::Date => &["date", "fecha"],
            PunchField::TimeOfDay => &["time_of_day", "time", "hora"],
            PunchField::Kind => &["kind", "tipo"],
        }
    }

    pub fn name(self) -> &'static str {
        self.accepted_keys()[0]
    }
}

impl fmt::Display for PunchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punch_kind_parse_is_case_insensitive() {
        assert_eq!(PunchKind::parse("IN"), Some(PunchKind::In));
        assert_eq!(PunchKind::parse(" out "), Some(PunchKind::Out));
        assert_eq!(PunchKind::parse("In"), Some(PunchKind::In));
        assert_eq!(PunchKind::parse("BREAK"), None);
        assert_eq!(PunchKind::parse(""), None);
    }

    #[test]
    fn roster_entry_ignores_extra_fields() {
        let employee: Employee = serde_json::from_str(
            r#"{"id": 7, "name": "Ana", "username": "ana", "address": {"city": "Quito"}}"#,
        )
        .unwrap();
        assert_eq!(employee, Employee::new(7, "Ana"));
    }

    #[test]
    fn field_names_use_english_key_first() {
        assert_eq!(PunchField::TimeOfDay.name(), "time_of_day");
        assert!(PunchField::EmployeeId.accepted_keys().contains(&"cedula"));
    }
}
