//! Read models for a day and a month of work

use chrono::NaiveDate;
use serde::Serialize;

use tanklog_domain::service::{
    check_compartment_loads, format_minutes, job_liters, log_duration, total_liters,
    total_shift_minutes, CompartmentAllocator, CompartmentLoad, ShiftDuration,
};
use tanklog_store::logs_in_month;
use tanklog_types::{AppState, Cargo, ClockTime, WorkLog};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropSummary {
    pub position: usize,
    pub id: String,
    pub customer_name: String,
    pub delivery_address: String,
    pub cargos: Vec<Cargo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub position: usize,
    pub id: String,
    pub job_number: String,
    pub customer_account: String,
    pub liters: f64,
    pub remaining_compartments: u32,
    /// Compartments a new cargo in this job could go into
    pub free_compartments: Vec<u32>,
    pub can_add_drop: bool,
    pub drops: Vec<DropSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub log_id: String,
    pub driver: Option<String>,
    pub truck: Option<String>,
    pub trailer: Option<String>,
    pub compartment_count: u32,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub duration: ShiftDuration,
    pub total_liters: f64,
    pub compartments: Vec<CompartmentLoad>,
    pub jobs: Vec<JobSummary>,
    pub notes: Option<String>,
}

/// Display name for a referenced entity; ids that no longer resolve are shown as-is
fn describe(id: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    id.map(|id| lookup(id).unwrap_or_else(|| format!("unknown ({})", id)))
}

impl DaySummary {
    pub fn build(state: &AppState, log: &WorkLog) -> Self {
        let trailer = state.trailer_for(log);
        let allocator = CompartmentAllocator::new(state.compartment_count_for(log));

        let jobs = log
            .jobs
            .iter()
            .zip(1..)
            .map(|(job, position)| JobSummary {
                position,
                id: job.id.clone(),
                job_number: job.job_number.clone(),
                customer_account: job.customer_account.clone(),
                liters: job_liters(job),
                remaining_compartments: allocator.remaining_count(job),
                free_compartments: allocator.selectable_compartments(job, None),
                can_add_drop: allocator.can_add_drop(job),
                drops: job
                    .drops
                    .iter()
                    .zip(1..)
                    .map(|(d, position)| DropSummary {
                        position,
                        id: d.id.clone(),
                        customer_name: d.customer_name.clone(),
                        delivery_address: d.delivery_address.clone(),
                        cargos: d.cargos.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            date: log.date,
            log_id: log.id.clone(),
            driver: describe(log.driver_id.as_deref(), |id| {
                state.driver(id).map(|d| d.name.clone())
            }),
            truck: describe(log.truck_id.as_deref(), |id| {
                state.truck(id).map(|t| t.plate.clone())
            }),
            trailer: trailer.map(|t| t.plate.clone()),
            compartment_count: allocator.compartment_count(),
            start_time: log.start_time,
            end_time: log.end_time,
            duration: log_duration(log),
            total_liters: total_liters(log),
            compartments: check_compartment_loads(log, trailer),
            jobs,
            notes: log.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthDay {
    pub date: NaiveDate,
    pub duration: ShiftDuration,
    pub jobs: usize,
    pub drops: usize,
    pub total_liters: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub days: Vec<MonthDay>,
    /// Days with both shift times recorded
    pub worked_days: usize,
    pub total_minutes: i64,
    pub total_label: String,
    pub total_liters: f64,
}

impl MonthSummary {
    pub fn build(state: &AppState, year: i32, month: u32) -> Self {
        let logs = logs_in_month(state, year, month);
        let days: Vec<MonthDay> = logs
            .iter()
            .map(|log| MonthDay {
                date: log.date,
                duration: log_duration(log),
                jobs: log.jobs.len(),
                drops: log.jobs.iter().map(|j| j.drops.len()).sum(),
                total_liters: total_liters(log),
            })
            .collect();
        let total_minutes = total_shift_minutes(logs.iter().copied());

        Self {
            year,
            month,
            total_liters: days.iter().map(|d| d.total_liters).sum(),
            worked_days: days.iter().filter(|d| d.duration.is_computable()).count(),
            days,
            total_minutes,
            total_label: format_minutes(total_minutes),
        }
    }
}
