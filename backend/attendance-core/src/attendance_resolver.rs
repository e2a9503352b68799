// src/attendance_resolver.rs
use chrono::{NaiveTime, Timelike};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::punch_records::{Employee, EmployeeId, PunchKind, PunchRecord, TIME_FORMAT};
use crate::reporter::{AttendanceReporter, ReportEvent};

// --- Constants ---

/// Arrivals strictly after 08:00:00 are late.
pub const LATE_THRESHOLD_SECS: u32 = 8 * 60 * 60;

// --- Result Structures ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Assisted,
    Late,
    InProgress,
    Incomplete,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Assisted => "ASSISTED",
            AttendanceStatus::Late => "LATE",
            AttendanceStatus::InProgress => "IN_PROGRESS",
            AttendanceStatus::Incomplete => "INCOMPLETE",
            AttendanceStatus::Absent => "ABSENT",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worked time for the day, in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkedDuration {
    Elapsed { hours: i64, minutes: i64 },
    NotApplicable,
}

impl WorkedDuration {
    pub const ZERO: WorkedDuration = WorkedDuration::Elapsed {
        hours: 0,
        minutes: 0,
    };

    /// Seconds are discarded before splitting into hours and minutes.
    fn between(entry: NaiveTime, exit: NaiveTime) -> Self {
        let total_minutes = (exit - entry).num_minutes();
        WorkedDuration::Elapsed {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
        }
    }
}

impl fmt::Display for WorkedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkedDuration::Elapsed { hours, minutes } => write!(f, "{}h {}m", hours, minutes),
            WorkedDuration::NotApplicable => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceResult {
    pub employee_id: EmployeeId,
    pub name: String,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    pub worked_duration: WorkedDuration,
    pub status: AttendanceStatus,
    /// Set when the last OUT precedes the first IN.
    pub out_of_order: bool,
}

impl AttendanceResult {
    pub fn entry_time_display(&self) -> String {
        render_time(self.entry_time)
    }

    pub fn exit_time_display(&self) -> String {
        render_time(self.exit_time)
    }
}

fn render_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTally {
    pub assisted: usize,
    pub late: usize,
    pub in_progress: usize,
    pub incomplete: usize,
    pub absent: usize,
}

impl StatusTally {
    pub fn from_results(results: &[AttendanceResult]) -> Self {
        let mut tally = StatusTally::default();
        for result in results {
            match result.status {
                AttendanceStatus::Assisted => tally.assisted += 1,
                AttendanceStatus::Late => tally.late += 1,
                AttendanceStatus::InProgress => tally.in_progress += 1,
                AttendanceStatus::Incomplete => tally.incomplete += 1,
                AttendanceStatus::Absent => tally.absent += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.assisted + self.late + self.in_progress + self.incomplete + self.absent
    }

    /// Employees that showed up, whether or not they have left yet.
    pub fn attended(&self) -> usize {
        self.assisted + self.late + self.in_progress
    }
}

// --- Resolution ---

/// Derives one employee's attendance from that employee's punches for the day.
pub fn resolve_employee(employee: &Employee, punches: &[&PunchRecord]) -> AttendanceResult {
    let entry = punches
        .iter()
        .filter(|p| p.kind == PunchKind::In)
        .map(|p| p.time_of_day)
        .min();
    let exit = punches
        .iter()
        .filter(|p| p.kind == PunchKind::Out)
        .map(|p| p.time_of_day)
        .max();

    let (status, worked_duration, out_of_order) = match (entry, exit) {
        (Some(entry), Some(exit)) if exit < entry => {
            (AttendanceStatus::Incomplete, WorkedDuration::NotApplicable, true)
        }
        (Some(entry), Some(exit)) => {
            let status = if entry.num_seconds_from_midnight() > LATE_THRESHOLD_SECS {
                AttendanceStatus::Late
            } else {
                AttendanceStatus::Assisted
            };
            (status, WorkedDuration::between(entry, exit), false)
        }
        (Some(_), None) => (AttendanceStatus::InProgress, WorkedDuration::NotApplicable, false),
        (None, Some(_)) => (AttendanceStatus::Incomplete, WorkedDuration::NotApplicable, false),
        (None, None) => (AttendanceStatus::Absent, WorkedDuration::ZERO, false),
    };

    AttendanceResult {
        employee_id: employee.id,
        name: employee.name.clone(),
        entry_time: entry,
        exit_time: exit,
        worked_duration,
        status,
        out_of_order,
    }
}

/// Resolves every roster employee, in roster order, against the day's valid
/// punches. Out-of-order days are reported at warn level.
pub fn resolve_roster(
    roster: &[Employee],
    punches: &[PunchRecord],
    reporter: &dyn AttendanceReporter,
) -> Vec<AttendanceResult> {
    let mut by_employee: HashMap<EmployeeId, Vec<&PunchRecord>> = HashMap::new();
    for punch in punches {
        by_employee.entry(punch.employee_id).or_default().push(punch);
    }

    roster
        .iter()
        .map(|employee| {
            let own = by_employee
                .get(&employee.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let result = resolve_employee(employee, own);
            if let (true, Some(entry), Some(exit)) =
                (result.out_of_order, result.entry_time, result.exit_time)
            {
                reporter.warn(ReportEvent::OutOfOrderPunches {
                    employee_id: employee.id,
                    entry,
                    exit,
                });
            }
            result
        })
        .collect()
}
