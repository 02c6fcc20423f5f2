//! Load-time normalization of saved snapshots
//!
//! A snapshot is first decoded as the current schema. If its structure does
//! not match (typically drops saved before they carried a `cargos` list, or a
//! single field of the wrong type) it is decoded once more through the
//! lenient legacy shape, which keeps every readable entity. Nothing here
//! fails: input that is not JSON yields the default state and a warning.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use tanklog_types::{bounded_compartment_count, AppState, Trailer};

use crate::legacy::LegacyState;
use crate::log_book::upsert_work_log;

/// Normalize a raw saved snapshot
pub fn normalize(raw: &str) -> AppState {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => normalize_value(value),
        Err(e) => {
            warn!(error = %e, "could not parse saved state, starting from defaults");
            AppState::default()
        }
    }
}

/// Normalize an already-parsed snapshot
pub fn normalize_value(value: Value) -> AppState {
    let state = match AppState::deserialize(&value) {
        Ok(state) => state,
        Err(current) => match LegacyState::deserialize(&value) {
            Ok(legacy) => {
                debug!(reason = %current, "migrating saved state from legacy shape");
                legacy.into_current()
            }
            Err(e) => {
                warn!(error = %e, "saved state has an unknown shape, starting from defaults");
                return AppState::default();
            }
        },
    };
    fill_defaults(state)
}

fn bound_trailer(mut trailer: Trailer) -> Trailer {
    let count = bounded_compartment_count(trailer.compartment_count);
    if count != trailer.compartment_count {
        warn!(
            plate = %trailer.plate,
            saved = trailer.compartment_count,
            count,
            "saved trailer compartment count out of range"
        );
        trailer.compartment_count = count;
    }
    trailer
}

/// Fill blanks left by older versions and restore the one-log-per-date rule
fn fill_defaults(state: AppState) -> AppState {
    let AppState {
        drivers,
        trucks,
        trailers,
        work_logs,
    } = state;

    let seeded = AppState {
        drivers: if drivers.is_empty() {
            AppState::default_drivers()
        } else {
            drivers
        },
        trucks: if trucks.is_empty() {
            AppState::default_trucks()
        } else {
            trucks
        },
        trailers: if trailers.is_empty() {
            AppState::default_trailers()
        } else {
            trailers.into_iter().map(bound_trailer).collect()
        },
        work_logs: Vec::new(),
    };

    work_logs.into_iter().fold(seeded, |acc, mut log| {
        for (i, job) in log.jobs.iter_mut().enumerate() {
            if job.job_number.trim().is_empty() {
                job.job_number = format!("JOB-{}", i + 1);
            }
        }
        upsert_work_log(acc, log)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tanklog_types::CargoType;

    #[test]
    fn test_unparseable_input_yields_defaults() {
        let state = normalize("{not json");
        assert_eq!(state.drivers[0].name, "Primary Driver");
        assert_eq!(state.trailers[0].compartment_count, 6);
        assert!(state.work_logs.is_empty());
    }

    #[test]
    fn test_non_object_yields_defaults() {
        let state = normalize("[1, 2, 3]");
        assert_eq!(state.trucks[0].plate, "TRK-001");
        assert!(state.work_logs.is_empty());
    }

    #[test]
    fn test_empty_reference_lists_are_seeded() {
        let state = normalize(r#"{"drivers": [], "workLogs": []}"#);
        assert_eq!(state.drivers.len(), 1);
        assert_eq!(state.trucks.len(), 1);
        assert_eq!(state.trailers.len(), 1);
    }

    #[test]
    fn test_legacy_drop_is_lifted_into_cargo() {
        let raw = json!({
            "drivers": [{"id": "d1", "name": "Ana"}],
            "workLogs": [{
                "id": "log1",
                "date": "2024-02-10",
                "jobs": [{
                    "id": "j1",
                    "customerAccount": "HARBOUR",
                    "drops": [
                        {"id": "x", "cargoType": "diesel", "liters": 500, "compartment": 2},
                        {"cargoType": "kerosene"}
                    ]
                }]
            }]
        });
        let state = normalize_value(raw);
        assert_eq!(state.drivers[0].name, "Ana");

        let job = &state.work_logs[0].jobs[0];
        assert_eq!(job.job_number, "JOB-1");

        let first = &job.drops[0];
        assert_eq!(first.id, "x");
        assert_eq!(first.customer_name, "HARBOUR");
        assert_eq!(first.cargos.len(), 1);
        assert_eq!(first.cargos[0].cargo_type, CargoType::Diesel);
        assert_eq!(first.cargos[0].liters, 500.0);
        assert_eq!(first.cargos[0].compartment, 2);
        assert!(!first.cargos[0].id.is_empty());

        let second = &job.drops[1];
        assert!(!second.id.is_empty());
        assert_eq!(second.cargos[0].cargo_type, CargoType::Kerosene);
        assert_eq!(second.cargos[0].liters, 0.0);
        assert_eq!(second.cargos[0].compartment, 2);
    }

    #[test]
    fn test_legacy_keeps_current_shaped_drops() {
        let raw = json!({
            "workLogs": [{
                "date": "2024-02-11",
                "startTime": "not a time",
                "jobs": [{
                    "drops": [{
                        "customerName": "Depot",
                        "cargos": [{"id": "c1", "cargoType": "gas_oil", "liters": 1200, "compartment": 4}]
                    }]
                }]
            }]
        });
        let state = normalize_value(raw);
        let log = &state.work_logs[0];
        assert_eq!(log.start_time, None);
        let cargo = &log.jobs[0].drops[0].cargos[0];
        assert_eq!(cargo.id, "c1");
        assert_eq!(cargo.cargo_type, CargoType::GasOil);
        assert_eq!(cargo.compartment, 4);
    }

    #[test]
    fn test_duplicate_dates_collapse_to_last() {
        let raw = json!({
            "workLogs": [
                {"id": "a", "date": "2024-02-12", "jobs": [], "notes": "first"},
                {"id": "b", "date": "2024-02-12", "jobs": [], "notes": "second"}
            ]
        });
        let state = normalize_value(raw);
        assert_eq!(state.work_logs.len(), 1);
        assert_eq!(state.work_logs[0].id, "b");
    }

    #[test]
    fn test_blank_job_number_filled_by_position() {
        let raw = json!({
            "workLogs": [{
                "id": "l", "date": "2024-02-13",
                "jobs": [
                    {"id": "j1", "jobNumber": "A-7", "drops": []},
                    {"id": "j2", "jobNumber": "", "drops": []}
                ]
            }]
        });
        let state = normalize_value(raw);
        let numbers: Vec<_> = state.work_logs[0].jobs.iter().map(|j| j.job_number.as_str()).collect();
        assert_eq!(numbers, vec!["A-7", "JOB-2"]);
        assert_eq!(state.work_logs[0].jobs[1].customer_account, "");
    }

    #[test]
    fn test_bad_field_keeps_rest_of_snapshot() {
        let raw = json!({
            "drivers": [{"id": "d1", "name": "Ana"}, {"id": 7, "name": ["x"]}],
            "trucks": "not a list",
            "workLogs": [
                {"id": "l1", "date": "2024-03-01", "jobs": [], "notes": "keep me"},
                {
                    "id": "l2",
                    "date": "2024-03-02",
                    "jobs": [{
                        "id": "j1",
                        "jobNumber": "A-1",
                        "drops": [
                            {"id": "x", "cargoType": "diesel", "liters": "750", "compartment": "2"},
                            {"id": "y", "cargoType": "petrol", "liters": 100, "compartment": -3},
                            "garbage"
                        ]
                    }]
                }
            ]
        });
        let state = normalize_value(raw);

        assert_eq!(state.drivers.len(), 2);
        assert_eq!(state.drivers[0].name, "Ana");
        assert_eq!(state.drivers[1].name, "");
        assert_eq!(state.trucks[0].plate, "TRK-001");
        assert_eq!(state.work_logs.len(), 2);
        assert_eq!(state.work_logs[0].notes.as_deref(), Some("keep me"));

        let drops = &state.work_logs[1].jobs[0].drops;
        assert_eq!(drops.len(), 2);
        assert_eq!(drops[0].cargos[0].compartment, 2);
        assert_eq!(drops[0].cargos[0].liters, 750.0);
        // unreadable compartment falls back to the drop's position
        assert_eq!(drops[1].cargos[0].compartment, 2);
        assert_eq!(drops[1].cargos[0].liters, 100.0);
    }

    #[test]
    fn test_current_shape_with_bad_cargo_field_is_kept() {
        let raw = json!({
            "drivers": [{"id": "d1", "name": "Ana"}],
            "trucks": [{"id": "t1", "plate": "TRK-9"}],
            "trailers": [{"id": "r1", "plate": "TRL-9", "compartmentCount": 4, "maxPerCompartmentLiters": 6000}],
            "workLogs": [{
                "id": "l1",
                "date": "2024-03-03",
                "trailerId": "r1",
                "jobs": [{
                    "id": "j1",
                    "jobNumber": "A-1",
                    "customerAccount": "Dock",
                    "drops": [{
                        "id": "p1",
                        "customerName": "Dock",
                        "deliveryAddress": "Pier 4",
                        "cargos": [{"id": "c1", "cargoType": "diesel", "liters": 300, "compartment": "3"}]
                    }]
                }]
            }]
        });
        let state = normalize_value(raw);
        assert_eq!(state.trailers[0].compartment_count, 4);
        assert_eq!(state.work_logs[0].trailer_id.as_deref(), Some("r1"));
        let cargo = &state.work_logs[0].jobs[0].drops[0].cargos[0];
        assert_eq!(cargo.id, "c1");
        assert_eq!(cargo.compartment, 3);
    }

    #[test]
    fn test_oversized_saved_trailer_is_capped() {
        let raw = json!({
            "trailers": [{"id": "r1", "plate": "BIG", "compartmentCount": 4_294_967_295u32, "maxPerCompartmentLiters": 7200}],
            "workLogs": []
        });
        let state = normalize_value(raw);
        assert_eq!(state.trailers[0].compartment_count, tanklog_types::MAX_COMPARTMENT_COUNT);
    }
}
