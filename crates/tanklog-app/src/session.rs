//! Working session over the persisted state
//!
//! State is loaded once when the session opens. Each action is reduced into
//! a new state which is saved before it replaces the current one, so the
//! in-memory state never runs ahead of what is on disk.

use chrono::NaiveDate;
use tracing::debug;

use tanklog_domain::model::EditOutcome;
use tanklog_domain::repository::StateRepository;
use tanklog_store::{find_work_log, reduce, Action, Transition};
use tanklog_types::{AppState, Result, WorkLog};

pub struct Session<R: StateRepository> {
    repo: R,
    state: AppState,
}

impl<R: StateRepository> Session<R> {
    /// Load state from the repository
    pub fn open(repo: R) -> Result<Self> {
        let state = repo.load()?;
        debug!(
            drivers = state.drivers.len(),
            trailers = state.trailers.len(),
            logs = state.work_logs.len(),
            "session opened"
        );
        Ok(Self { repo, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one action and persist the resulting state
    pub fn apply(&mut self, action: Action) -> Result<EditOutcome> {
        let Transition { state, outcome } = reduce(self.state.clone(), action);
        self.repo.save(&state)?;
        self.state = state;
        Ok(outcome)
    }

    /// Log for `date`, creating the blank log on first visit
    pub fn select_date(&mut self, date: NaiveDate) -> Result<&WorkLog> {
        if find_work_log(&self.state, date).is_none() {
            self.apply(Action::SelectDate(date))?;
        }
        find_work_log(&self.state, date).ok_or_else(|| tanklog_types::Error::UnknownReference {
            kind: "work log",
            key: date.to_string(),
        })
    }
}
