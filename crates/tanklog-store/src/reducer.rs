//! State transitions
//!
//! [`reduce`] is the only way state changes: it takes the previous state by
//! value plus one [`Action`] and returns the next state together with what
//! happened.

use chrono::NaiveDate;
use tracing::debug;

use tanklog_domain::model::{
    Assignment, CargoDraft, CargoPatch, DropDraft, DropPatch, EditOutcome, ItemRef, JobPatch,
    Refusal, ShiftPatch,
};
use tanklog_domain::service::{log_editor, CompartmentAllocator};
use tanklog_types::{AppState, WorkLog, MAX_COMPARTMENT_COUNT};

use crate::log_book::{ensure_work_log, upsert_work_log};
use crate::reference::{add_driver, add_trailer, add_truck};

/// Edit applied to the log of one day
#[derive(Debug, Clone, PartialEq)]
pub enum LogEdit {
    AddJob { patch: JobPatch },
    RemoveJob { job: ItemRef },
    UpdateJob { job: ItemRef, patch: JobPatch },
    AddDrop { job: ItemRef, draft: DropDraft },
    RemoveDrop { job: ItemRef, drop: ItemRef },
    UpdateDrop { job: ItemRef, drop: ItemRef, patch: DropPatch },
    AddCargo { job: ItemRef, drop: ItemRef, draft: CargoDraft },
    RemoveCargo { job: ItemRef, drop: ItemRef, cargo: ItemRef },
    UpdateCargo { job: ItemRef, drop: ItemRef, cargo: ItemRef, patch: CargoPatch },
    Assign(Assignment),
    Shift(ShiftPatch),
    Notes(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Select a day, creating its blank log on first visit
    SelectDate(NaiveDate),
    /// Store a whole log, replacing any log of the same date
    UpsertLog(WorkLog),
    AddDriver { name: String },
    AddTruck { plate: String },
    AddTrailer {
        plate: String,
        compartment_count: Option<u32>,
        max_per_compartment_liters: Option<f64>,
    },
    Edit { date: NaiveDate, edit: LogEdit },
}

/// Next state and the outcome of the action that produced it
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: AppState,
    pub outcome: EditOutcome,
}

impl Transition {
    fn new(state: AppState, outcome: EditOutcome) -> Self {
        Self { state, outcome }
    }
}

fn blank_name(value: &str) -> bool {
    value.trim().is_empty()
}

/// Apply one action to the state
pub fn reduce(state: AppState, action: Action) -> Transition {
    debug!(?action, "reduce");
    match action {
        Action::SelectDate(date) => {
            let existed = crate::log_book::has_log(&state, date);
            let state = ensure_work_log(state, date);
            let outcome = match crate::log_book::find_work_log(&state, date) {
                Some(log) if !existed => EditOutcome::Created { id: log.id.clone() },
                _ => EditOutcome::Applied,
            };
            Transition::new(state, outcome)
        }
        Action::UpsertLog(log) => Transition::new(upsert_work_log(state, log), EditOutcome::Applied),
        Action::AddDriver { name } if blank_name(&name) => {
            Transition::new(state, EditOutcome::refused(Refusal::BlankName))
        }
        Action::AddDriver { name } => {
            let (state, driver) = add_driver(state, &name);
            Transition::new(state, EditOutcome::Created { id: driver.id })
        }
        Action::AddTruck { plate } if blank_name(&plate) => {
            Transition::new(state, EditOutcome::refused(Refusal::BlankName))
        }
        Action::AddTruck { plate } => {
            let (state, truck) = add_truck(state, &plate);
            Transition::new(state, EditOutcome::Created { id: truck.id })
        }
        Action::AddTrailer { plate, .. } if blank_name(&plate) => {
            Transition::new(state, EditOutcome::refused(Refusal::BlankName))
        }
        Action::AddTrailer {
            compartment_count: Some(count),
            ..
        } if count > MAX_COMPARTMENT_COUNT => Transition::new(
            state,
            EditOutcome::refused(Refusal::TooManyCompartments {
                count,
                max: MAX_COMPARTMENT_COUNT,
            }),
        ),
        Action::AddTrailer {
            plate,
            compartment_count,
            max_per_compartment_liters,
        } => {
            let (state, trailer) =
                add_trailer(state, &plate, compartment_count, max_per_compartment_liters);
            Transition::new(state, EditOutcome::Created { id: trailer.id })
        }
        Action::Edit { date, edit } => edit_log(state, date, edit),
    }
}

fn edit_log(state: AppState, date: NaiveDate, edit: LogEdit) -> Transition {
    let mut state = ensure_work_log(state, date);
    let Some(at) = state.work_logs.iter().position(|l| l.date == date) else {
        // ensure_work_log always leaves a log for the date
        return Transition::new(state, EditOutcome::Applied);
    };
    let allocator = CompartmentAllocator::new(state.compartment_count_for(&state.work_logs[at]));
    let log = &mut state.work_logs[at];

    let outcome = match edit {
        LogEdit::AddJob { patch } => log_editor::add_job(log, patch),
        LogEdit::RemoveJob { job } => log_editor::remove_job(log, &job),
        LogEdit::UpdateJob { job, patch } => log_editor::update_job(log, &job, patch),
        LogEdit::AddDrop { job, draft } => log_editor::add_drop(log, &allocator, &job, draft),
        LogEdit::RemoveDrop { job, drop } => log_editor::remove_drop(log, &job, &drop),
        LogEdit::UpdateDrop { job, drop, patch } => {
            log_editor::update_drop(log, &job, &drop, patch)
        }
        LogEdit::AddCargo { job, drop, draft } => {
            log_editor::add_cargo(log, &allocator, &job, &drop, draft)
        }
        LogEdit::RemoveCargo { job, drop, cargo } => {
            log_editor::remove_cargo(log, &job, &drop, &cargo)
        }
        LogEdit::UpdateCargo {
            job,
            drop,
            cargo,
            patch,
        } => log_editor::update_cargo(log, &allocator, &job, &drop, &cargo, patch),
        LogEdit::Assign(assignment) => log_editor::set_assignment(log, assignment),
        LogEdit::Shift(patch) => log_editor::set_shift(log, patch),
        LogEdit::Notes(notes) => log_editor::set_notes(log, notes),
    };

    debug!(%date, %outcome, "log edited");
    Transition::new(state, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tanklog_types::ClockTime;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn edit(state: AppState, edit: LogEdit) -> Transition {
        reduce(state, Action::Edit { date: day(), edit })
    }

    #[test]
    fn test_select_date_creates_once() {
        let t = reduce(AppState::default(), Action::SelectDate(day()));
        assert!(matches!(t.outcome, EditOutcome::Created { .. }));
        let t = reduce(t.state, Action::SelectDate(day()));
        assert_eq!(t.outcome, EditOutcome::Applied);
        assert_eq!(t.state.work_logs.len(), 1);
    }

    #[test]
    fn test_edit_creates_log_lazily() {
        let t = edit(AppState::default(), LogEdit::AddJob { patch: JobPatch::default() });
        assert_eq!(t.state.work_logs.len(), 1);
        assert_eq!(t.state.work_logs[0].jobs.len(), 1);
    }

    #[test]
    fn test_add_job_applies_number_and_account_in_one_step() {
        let t = edit(
            AppState::default(),
            LogEdit::AddJob {
                patch: JobPatch {
                    job_number: Some("PO-88".to_string()),
                    customer_account: Some("Northside".to_string()),
                },
            },
        );
        let EditOutcome::Created { id } = t.outcome else {
            panic!("job not created");
        };
        let job = &t.state.work_logs[0].jobs[0];
        assert_eq!(job.id, id);
        assert_eq!(job.job_number, "PO-88");
        assert_eq!(job.customer_account, "Northside");
    }

    #[test]
    fn test_blank_reference_names_refused() {
        let t = reduce(
            AppState::default(),
            Action::AddDriver {
                name: "   ".to_string(),
            },
        );
        assert_eq!(t.outcome, EditOutcome::refused(Refusal::BlankName));
        assert_eq!(t.state.drivers.len(), 1);
    }

    #[test]
    fn test_oversized_trailer_refused() {
        let t = reduce(
            AppState::default(),
            Action::AddTrailer {
                plate: "BIG".to_string(),
                compartment_count: Some(u32::MAX),
                max_per_compartment_liters: None,
            },
        );
        assert_eq!(
            t.outcome,
            EditOutcome::refused(Refusal::TooManyCompartments {
                count: u32::MAX,
                max: MAX_COMPARTMENT_COUNT,
            })
        );
        assert_eq!(t.state.trailers.len(), 1);

        let t = reduce(
            t.state,
            Action::AddTrailer {
                plate: "WIDE".to_string(),
                compartment_count: Some(MAX_COMPARTMENT_COUNT),
                max_per_compartment_liters: None,
            },
        );
        assert!(matches!(t.outcome, EditOutcome::Created { .. }));
        assert_eq!(t.state.trailers[1].compartment_count, MAX_COMPARTMENT_COUNT);
    }

    #[test]
    fn test_trailer_selection_governs_compartments() {
        let t = reduce(
            AppState::default(),
            Action::AddTrailer {
                plate: "TRL-2".to_string(),
                compartment_count: Some(2),
                max_per_compartment_liters: None,
            },
        );
        let EditOutcome::Created { id: trailer_id } = t.outcome.clone() else {
            panic!("trailer not created");
        };
        let t = edit(
            t.state,
            LogEdit::Assign(Assignment {
                trailer_id: Some(trailer_id),
                ..Default::default()
            }),
        );
        let mut state = edit(t.state, LogEdit::AddJob { patch: JobPatch::default() }).state;
        let job = ItemRef::Position(1);
        for _ in 0..2 {
            state = edit(
                state,
                LogEdit::AddDrop {
                    job: job.clone(),
                    draft: DropDraft::default(),
                },
            )
            .state;
        }
        let t = edit(
            state,
            LogEdit::AddDrop {
                job,
                draft: DropDraft::default(),
            },
        );
        assert_eq!(t.outcome, EditOutcome::refused(Refusal::CompartmentsExhausted));
        assert_eq!(t.state.work_logs[0].jobs[0].drops.len(), 2);
    }

    #[test]
    fn test_shift_and_notes() {
        let t = edit(
            AppState::default(),
            LogEdit::Shift(ShiftPatch {
                start_time: Some(ClockTime::from_hm(22, 0)),
                end_time: Some(ClockTime::from_hm(2, 0)),
            }),
        );
        let t = edit(t.state, LogEdit::Notes(Some("Night run".to_string())));
        let log = &t.state.work_logs[0];
        assert_eq!(log.notes.as_deref(), Some("Night run"));
        assert_eq!(tanklog_domain::service::log_duration(log).minutes, 240);
    }
}
