//! Shift duration calculation

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use tanklog_types::{ClockTime, WorkLog};

/// Label shown when a duration cannot be computed
pub const NOT_COMPUTABLE_LABEL: &str = "—";

/// Elapsed shift time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftDuration {
    pub minutes: i64,
    pub label: String,
}

impl ShiftDuration {
    fn not_computable() -> Self {
        Self {
            minutes: 0,
            label: NOT_COMPUTABLE_LABEL.to_string(),
        }
    }

    pub fn is_computable(&self) -> bool {
        self.label != NOT_COMPUTABLE_LABEL
    }
}

/// Minutes between `start` and `end` on `date`.
///
/// An end earlier than the start is taken to fall on the next day (overnight
/// shift). Either time missing yields `0` minutes and the `—` label.
pub fn compute_duration(
    date: NaiveDate,
    start: Option<ClockTime>,
    end: Option<ClockTime>,
) -> ShiftDuration {
    let (Some(start), Some(end)) = (start, end) else {
        return ShiftDuration::not_computable();
    };

    let start_at = date.and_time(start.as_naive());
    let mut end_at = date.and_time(end.as_naive());
    if end_at < start_at {
        end_at += Duration::days(1);
    }

    let minutes = (end_at - start_at).num_minutes();
    ShiftDuration {
        minutes,
        label: format_minutes(minutes),
    }
}

/// Duration of a logged shift
pub fn log_duration(log: &WorkLog) -> ShiftDuration {
    compute_duration(log.date, log.start_time, log.end_time)
}

/// Render a minute count as `{h}h {mm}m`
pub fn format_minutes(minutes: i64) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Sum of computable shift durations
pub fn total_shift_minutes<'a>(logs: impl IntoIterator<Item = &'a WorkLog>) -> i64 {
    logs.into_iter().map(|log| log_duration(log).minutes).sum()
}
