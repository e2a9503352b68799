// src/daily_run.rs
use chrono::NaiveDate;

use crate::attendance_resolver::{resolve_roster, AttendanceResult, StatusTally};
use crate::punch_loader::PunchSource;
use crate::punch_records::{Employee, RawPunch};
use crate::record_filter::{filter_records, FilterStats};
use crate::reporter::{AttendanceReporter, InputSource, ReportEvent};
use crate::roster_client::{RosterError, RosterSource};

/// Everything one run produces for a single day.
#[derive(Debug, Clone)]
pub struct DailyAttendance {
    pub date: NaiveDate,
    pub results: Vec<AttendanceResult>,
    pub filter_stats: FilterStats,
    pub tally: StatusTally,
}

/// Filters the raw punches for `date` and resolves every roster employee.
/// Never fails: malformed punches are reported and skipped.
pub fn process_day(
    roster: &[Employee],
    raw_punches: &[RawPunch],
    date: NaiveDate,
    reporter: &dyn AttendanceReporter,
) -> DailyAttendance {
    let outcome = filter_records(raw_punches, Some(date));
    let filter_stats = outcome.stats();

    reporter.info(ReportEvent::BatchFiltered(filter_stats));
    for invalid in outcome.invalid {
        reporter.warn(ReportEvent::InvalidRecord(invalid));
    }

    let results = resolve_roster(roster, &outcome.valid, reporter);
    let tally = StatusTally::from_results(&results);
    reporter.info(ReportEvent::StatusSummary(tally));

    DailyAttendance {
        date,
        results,
        filter_stats,
        tally,
    }
}

/// Fetches the roster, degrading to an empty one when the source fails.
pub async fn load_roster(
    source: &dyn RosterSource,
    reporter: &dyn AttendanceReporter,
) -> Vec<Employee> {
    match source.fetch_employees().await {
        Ok(employees) => employees,
        Err(e) => {
            reporter.error(ReportEvent::SourceUnavailable {
                source: InputSource::Roster,
                detail: e.to_string(),
            });
            Vec::new()
        }
    }
}

/// Same as [`load_roster`] for a source that may have failed to build.
pub async fn load_roster_or_empty<S: RosterSource>(
    source: Result<S, RosterError>,
    reporter: &dyn AttendanceReporter,
) -> Vec<Employee> {
    match source {
        Ok(source) => load_roster(&source, reporter).await,
        Err(e) => {
            reporter.error(ReportEvent::SourceUnavailable {
                source: InputSource::Roster,
                detail: e.to_string(),
            });
            Vec::new()
        }
    }
}

/// Loads raw punches, degrading to an empty list when the source fails.
pub fn load_punches(
    source: &dyn PunchSource,
    date: NaiveDate,
    reporter: &dyn AttendanceReporter,
) -> Vec<RawPunch> {
    match source.load_punches(date) {
        Ok(punches) => punches,
        Err(e) => {
            reporter.error(ReportEvent::SourceUnavailable {
                source: InputSource::Punches,
                detail: e.to_string(),
            });
            Vec::new()
        }
    }
}
