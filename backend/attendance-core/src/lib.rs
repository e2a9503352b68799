// src/lib.rs
//! Daily attendance from raw time-clock punches.
//!
//! The core is [`record_filter`] (validates raw punches) and
//! [`attendance_resolver`] (pairs punches into one result per employee).
//! [`daily_run`] wires them together behind an injected
//! [`reporter::AttendanceReporter`]; the remaining modules are the I/O
//! around it.

pub mod attendance_resolver;
pub mod cli;
pub mod config;
pub mod csv_report;
pub mod daily_run;
pub mod logging;
pub mod punch_loader;
pub mod punch_records;
pub mod record_filter;
pub mod reporter;
pub mod roster_client;
