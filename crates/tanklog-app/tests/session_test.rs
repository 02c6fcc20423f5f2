//! Session persistence and read models against a temporary data directory

use std::fs;

use chrono::NaiveDate;
use serde_json::json;
use tempfile::tempdir;

use tanklog_app::repository::open_state_repo_at;
use tanklog_app::session::Session;
use tanklog_app::summary::{DaySummary, MonthSummary};
use tanklog_domain::model::{
    Assignment, CargoDraft, DropDraft, EditOutcome, ItemRef, JobPatch, ShiftPatch,
};
use tanklog_infra::persistence::STATE_FILE_NAME;
use tanklog_store::{Action, LogEdit};
use tanklog_types::{CargoType, ClockTime};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
}

fn edit(date: NaiveDate, edit: LogEdit) -> Action {
    Action::Edit { date, edit }
}

#[test]
fn test_changes_survive_reopen() {
    let dir = tempdir().unwrap();

    {
        let mut session = Session::open(open_state_repo_at(dir.path().to_path_buf()).unwrap()).unwrap();
        let outcome = session
            .apply(Action::AddDriver {
                name: "Lee Park".to_string(),
            })
            .unwrap();
        assert!(matches!(outcome, EditOutcome::Created { .. }));
        session.apply(edit(date(2), LogEdit::AddJob { patch: JobPatch::default() })).unwrap();
    }

    let session = Session::open(open_state_repo_at(dir.path().to_path_buf()).unwrap()).unwrap();
    assert_eq!(session.state().drivers.len(), 2);
    assert_eq!(session.state().drivers[1].name, "Lee Park");
    assert_eq!(session.state().work_logs[0].jobs[0].job_number, "JOB-1");
}

#[test]
fn test_select_date_creates_blank_log() {
    let dir = tempdir().unwrap();
    let mut session = Session::open(open_state_repo_at(dir.path().to_path_buf()).unwrap()).unwrap();

    let id = session.select_date(date(3)).unwrap().id.clone();
    let again = session.select_date(date(3)).unwrap().id.clone();
    assert_eq!(id, again);
    assert_eq!(session.state().work_logs.len(), 1);
}

#[test]
fn test_day_and_month_summaries() {
    let dir = tempdir().unwrap();
    let mut session = Session::open(open_state_repo_at(dir.path().to_path_buf()).unwrap()).unwrap();
    let driver_id = session.state().drivers[0].id.clone();

    session
        .apply(edit(
            date(5),
            LogEdit::Assign(Assignment {
                driver_id: Some(driver_id),
                truck_id: Some("gone".to_string()),
                trailer_id: None,
            }),
        ))
        .unwrap();
    session
        .apply(edit(
            date(5),
            LogEdit::Shift(ShiftPatch {
                start_time: Some(ClockTime::from_hm(21, 30)),
                end_time: Some(ClockTime::from_hm(5, 0)),
            }),
        ))
        .unwrap();
    session.apply(edit(date(5), LogEdit::AddJob { patch: JobPatch::default() })).unwrap();
    session
        .apply(edit(
            date(5),
            LogEdit::AddDrop {
                job: ItemRef::Position(1),
                draft: DropDraft::default(),
            },
        ))
        .unwrap();
    session
        .apply(edit(
            date(5),
            LogEdit::AddCargo {
                job: ItemRef::Position(1),
                drop: ItemRef::Position(1),
                draft: CargoDraft {
                    cargo_type: Some(CargoType::Petrol),
                    liters: Some(8000.0),
                    compartment: Some(2),
                },
            },
        ))
        .unwrap();

    let state = session.state().clone();
    let log = state.work_logs.iter().find(|l| l.date == date(5)).unwrap();
    let day = DaySummary::build(&state, log);
    assert_eq!(day.driver.as_deref(), Some("Primary Driver"));
    assert_eq!(day.truck.as_deref(), Some("unknown (gone)"));
    assert_eq!(day.trailer.as_deref(), Some("TRL-001"));
    assert_eq!(day.duration.minutes, 450);
    assert_eq!(day.duration.label, "7h 30m");
    assert_eq!(day.total_liters, 8000.0);
    assert!(day.compartments[1].is_overfilled);
    assert_eq!(day.jobs[0].remaining_compartments, 5);
    assert_eq!(day.jobs[0].free_compartments, vec![1, 3, 4, 5, 6]);
    assert!(day.jobs[0].can_add_drop);

    session.select_date(date(6)).unwrap();
    let month = MonthSummary::build(session.state(), 2024, 9);
    assert_eq!(month.days.len(), 2);
    assert_eq!(month.total_minutes, 450);
    assert_eq!(month.total_label, "7h 30m");
    assert_eq!(month.days[0].drops, 1);
    assert_eq!(month.days[1].duration.label, "—");
    assert_eq!(month.worked_days, 1);
}

#[test]
fn test_unreadable_field_does_not_wipe_saved_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    let saved = json!({
        "drivers": [{"id": "d1", "name": "Ana"}],
        "trucks": [{"id": "t1", "plate": "TRK-7"}],
        "trailers": [{"id": "r1", "plate": "TRL-7", "compartmentCount": 6, "maxPerCompartmentLiters": 7200}],
        "workLogs": [
            {"id": "l1", "date": "2024-03-01", "jobs": [], "notes": "keep me"},
            {
                "id": "l2",
                "date": "2024-03-02",
                "jobs": [{
                    "id": "j1",
                    "jobNumber": "A-1",
                    "drops": [{"id": "p1", "cargoType": "diesel", "liters": 900, "compartment": "2"}]
                }]
            }
        ]
    });
    fs::write(&path, saved.to_string()).unwrap();

    {
        let mut session = Session::open(open_state_repo_at(dir.path().to_path_buf()).unwrap()).unwrap();
        session.select_date(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()).unwrap();
    }

    let session = Session::open(open_state_repo_at(dir.path().to_path_buf()).unwrap()).unwrap();
    let state = session.state();
    assert_eq!(state.drivers[0].name, "Ana");
    assert_eq!(state.work_logs.len(), 3);
    let first = state.work_logs.iter().find(|l| l.id == "l1").unwrap();
    assert_eq!(first.notes.as_deref(), Some("keep me"));
    let second = state.work_logs.iter().find(|l| l.id == "l2").unwrap();
    let cargo = &second.jobs[0].drops[0].cargos[0];
    assert_eq!(cargo.compartment, 2);
    assert_eq!(cargo.liters, 900.0);
}
