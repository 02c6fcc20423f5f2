//! Compartment load totals and overfill checking

use serde::Serialize;

use tanklog_types::{Job, Trailer, WorkLog};

/// Liters carried in one compartment over a day, against its capacity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompartmentLoad {
    pub compartment: u32,
    pub liters: f64,
    pub capacity_liters: Option<f64>,
    pub load_ratio_percent: Option<f64>,
    pub is_overfilled: bool,
}

/// Liters per compartment (index 0 is compartment 1) across all jobs of the day.
/// Cargo outside `1..=compartment_count` is ignored.
pub fn compartment_totals(log: &WorkLog, compartment_count: u32) -> Vec<f64> {
    let mut totals = vec![0.0; compartment_count as usize];
    for cargo in log.jobs.iter().flat_map(Job::cargos) {
        if let Some(slot) = (cargo.compartment as usize)
            .checked_sub(1)
            .and_then(|i| totals.get_mut(i))
        {
            *slot += cargo.liters;
        }
    }
    totals
}

pub fn job_liters(job: &Job) -> f64 {
    job.cargos().map(|c| c.liters).sum()
}

pub fn total_liters(log: &WorkLog) -> f64 {
    log.jobs.iter().map(job_liters).sum()
}

/// Compare each compartment's daily total with the trailer's capacity.
///
/// Without a trailer the default compartment count applies and no
/// compartment is reported as overfilled.
pub fn check_compartment_loads(log: &WorkLog, trailer: Option<&Trailer>) -> Vec<CompartmentLoad> {
    let count = trailer
        .map(|t| tanklog_types::bounded_compartment_count(t.compartment_count))
        .unwrap_or(tanklog_types::DEFAULT_COMPARTMENT_COUNT);
    let capacity = trailer
        .map(|t| t.max_per_compartment_liters)
        .filter(|c| *c > 0.0);

    compartment_totals(log, count)
        .into_iter()
        .zip(1u32..)
        .map(|(liters, compartment)| {
            let is_overfilled = capacity.is_some_and(|cap| liters > cap);
            if is_overfilled {
                tracing::debug!(compartment, liters, "compartment over capacity");
            }
            CompartmentLoad {
                compartment,
                liters,
                capacity_liters: capacity,
                load_ratio_percent: capacity.map(|cap| liters / cap * 100.0),
                is_overfilled,
            }
        })
        .collect()
}
