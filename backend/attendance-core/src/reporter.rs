// src/reporter.rs
use chrono::NaiveTime;
use std::fmt;
use tracing::{error, info, warn};

use crate::attendance_resolver::StatusTally;
use crate::punch_records::{EmployeeId, TIME_FORMAT};
use crate::record_filter::{FilterStats, InvalidRecord};

/// Events the attendance core emits while processing a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    BatchFiltered(FilterStats),
    InvalidRecord(InvalidRecord),
    OutOfOrderPunches {
        employee_id: EmployeeId,
        entry: NaiveTime,
        exit: NaiveTime,
    },
    StatusSummary(StatusTally),
    SourceUnavailable {
        source: InputSource,
        detail: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Roster,
    Punches,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Roster => f.write_str("roster"),
            InputSource::Punches => f.write_str("punch records"),
        }
    }
}

/// Sink for core events. The core never logs directly; callers inject one of
/// these so the resolution stays free of I/O.
pub trait AttendanceReporter {
    fn info(&self, event: ReportEvent);
    fn warn(&self, event: ReportEvent);
    fn error(&self, event: ReportEvent);
}

/// Forwards core events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl TracingReporter {
    fn describe(event: &ReportEvent) -> String {
        match event {
            ReportEvent::BatchFiltered(stats) => format!(
                "Punch records loaded: {} total, {} valid, {} invalid, {} for other dates",
                stats.total, stats.valid, stats.invalid, stats.filtered_by_date
            ),
            ReportEvent::InvalidRecord(invalid) => format!(
                "Invalid punch record #{}: {} ({})",
                invalid.index, invalid.reason, invalid.raw
            ),
            ReportEvent::OutOfOrderPunches {
                employee_id,
                entry,
                exit,
            } => format!(
                "Employee {} has last OUT {} before first IN {}; marked INCOMPLETE",
                employee_id,
                exit.format(TIME_FORMAT),
                entry.format(TIME_FORMAT)
            ),
            ReportEvent::StatusSummary(tally) => format!(
                "Status tally: ASSISTED={}, LATE={}, IN_PROGRESS={}, INCOMPLETE={}, ABSENT={}",
                tally.assisted, tally.late, tally.in_progress, tally.incomplete, tally.absent
            ),
            ReportEvent::SourceUnavailable { source, detail } => {
                format!("Could not load {}, continuing with none: {}", source, detail)
            }
        }
    }
}

impl AttendanceReporter for TracingReporter {
    fn info(&self, event: ReportEvent) {
        info!("{}", Self::describe(&event));
    }

    fn warn(&self, event: ReportEvent) {
        warn!("{}", Self::describe(&event));
    }

    fn error(&self, event: ReportEvent) {
        error!("{}", Self::describe(&event));
    }
}

// --- Mock/Test Structures ---


#[cfg(test)]
mod tests {
    use super::*;
    use crate::punch_records::PunchField;
    use crate::record_filter::InvalidReason;

    #[test]
    fn descriptions_name_the_offending_record() {
        let event = ReportEvent::InvalidRecord(InvalidRecord {
            index: 4,
            reason: InvalidReason::MissingField {
                field: PunchField::Kind,
            },
            raw: serde_json::json!({"employee_id": 1}),
        });
        let text = TracingReporter::describe(&event);
        assert!(text.contains("#4"), "{}", text);
        assert!(text.contains("Mandatory field missing: kind"), "{}", text);
    }

    #[test]
    fn out_of_order_description_renders_times() {
        let event = ReportEvent::OutOfOrderPunches {
            employee_id: 9,
            entry: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            exit: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        };
        let text = TracingReporter::describe(&event);
        assert!(text.contains("07:30:00"), "{}", text);
        assert!(text.contains("09:00:00"), "{}", text);
    }
}
