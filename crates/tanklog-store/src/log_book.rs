//! Per-date work log collection
//!
//! The date is the natural key: the collection never holds two logs for the
//! same day, whatever their ids.

use chrono::{Datelike, NaiveDate};

use tanklog_types::{AppState, WorkLog};

/// Replace the log for `log.date`, or append it when the day has none
pub fn upsert_work_log(mut state: AppState, log: WorkLog) -> AppState {
    match state.work_logs.iter().position(|l| l.date == log.date) {
        Some(i) => state.work_logs[i] = log,
        None => state.work_logs.push(log),
    }
    state
}

/// Make sure `date` has a log, creating a blank one if needed
pub fn ensure_work_log(state: AppState, date: NaiveDate) -> AppState {
    if has_log(&state, date) {
        state
    } else {
        upsert_work_log(state, WorkLog::blank(date))
    }
}

pub fn find_work_log(state: &AppState, date: NaiveDate) -> Option<&WorkLog> {
    state.work_logs.iter().find(|l| l.date == date)
}

pub fn has_log(state: &AppState, date: NaiveDate) -> bool {
    find_work_log(state, date).is_some()
}

/// Logs of one calendar month, oldest first
pub fn logs_in_month(state: &AppState, year: i32, month: u32) -> Vec<&WorkLog> {
    let mut logs: Vec<_> = state
        .work_logs
        .iter()
        .filter(|l| l.date.year() == year && l.date.month() == month)
        .collect();
    logs.sort_by_key(|l| l.date);
    logs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_upsert_replaces_by_date_not_id() {
        let first = WorkLog::blank(date(4));
        let mut second = WorkLog::blank(date(4));
        second.notes = Some("second".to_string());
        assert_ne!(first.id, second.id);

        let state = upsert_work_log(AppState::default(), first);
        let state = upsert_work_log(state, second.clone());

        assert_eq!(state.work_logs.len(), 1);
        assert_eq!(state.work_logs[0], second);
    }

    #[test]
    fn test_upsert_appends_new_dates() {
        let state = upsert_work_log(AppState::default(), WorkLog::blank(date(4)));
        let state = upsert_work_log(state, WorkLog::blank(date(5)));
        assert_eq!(state.work_logs.len(), 2);
    }

    #[test]
    fn test_ensure_keeps_existing_log() {
        let mut log = WorkLog::blank(date(9));
        log.notes = Some("keep".to_string());
        let state = upsert_work_log(AppState::default(), log.clone());

        let state = ensure_work_log(state, date(9));
        assert_eq!(state.work_logs, vec![log]);

        let state = ensure_work_log(state, date(10));
        assert!(has_log(&state, date(10)));
        assert!(find_work_log(&state, date(10)).unwrap().jobs.is_empty());
    }

    #[test]
    fn test_logs_in_month_sorted() {
        let other_month = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let mut state = AppState::default();
        for d in [date(20), other_month, date(2), date(11)] {
            state = ensure_work_log(state, d);
        }
        let dates: Vec<_> = logs_in_month(&state, 2024, 3).iter().map(|l| l.date).collect();
        assert_eq!(dates, vec![date(2), date(11), date(20)]);
    }
}
