//! Job, drop and cargo editing on a day's work log
//!
//! Every operation is total: a refused or unresolved edit leaves the log
//! untouched and reports why through [`EditOutcome`].

use tanklog_types::{Cargo, DeliveryDrop, Job, WorkLog};

use crate::model::{
    Assignment, CargoDraft, CargoPatch, DropDraft, DropPatch, EditOutcome, ItemRef, JobPatch,
    Refusal, ShiftPatch, Target,
};
use crate::service::compartments::CompartmentAllocator;

type Step<T> = Result<T, EditOutcome>;

fn settle(step: Step<EditOutcome>) -> EditOutcome {
    step.unwrap_or_else(|outcome| outcome)
}

fn job_index(log: &WorkLog, job: &ItemRef) -> Step<usize> {
    job.locate(&log.jobs, |j| j.id.as_str())
        .ok_or_else(|| EditOutcome::not_found(Target::Job, job))
}

fn drop_index(job: &Job, drop: &ItemRef) -> Step<usize> {
    drop.locate(&job.drops, |d| d.id.as_str())
        .ok_or_else(|| EditOutcome::not_found(Target::Drop, drop))
}

fn cargo_index(drop: &DeliveryDrop, cargo: &ItemRef) -> Step<usize> {
    cargo
        .locate(&drop.cargos, |c| c.id.as_str())
        .ok_or_else(|| EditOutcome::not_found(Target::Cargo, cargo))
}

fn check_liters(liters: f64) -> Step<f64> {
    if liters.is_finite() && liters >= 0.0 {
        Ok(liters)
    } else {
        Err(EditOutcome::refused(Refusal::InvalidLiters))
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Append a job; without a job number it is numbered after the existing ones
pub fn add_job(log: &mut WorkLog, patch: JobPatch) -> EditOutcome {
    let job = Job {
        id: tanklog_types::new_id(),
        job_number: patch
            .job_number
            .and_then(non_empty)
            .unwrap_or_else(|| format!("JOB-{}", log.jobs.len() + 1)),
        customer_account: patch.customer_account.unwrap_or_default(),
        drops: Vec::new(),
    };
    let id = job.id.clone();
    log.jobs.push(job);
    EditOutcome::Created { id }
}

/// Remove a job together with its drops and cargo
pub fn remove_job(log: &mut WorkLog, job: &ItemRef) -> EditOutcome {
    settle(job_index(log, job).map(|i| {
        log.jobs.remove(i);
        EditOutcome::Applied
    }))
}

pub fn update_job(log: &mut WorkLog, job: &ItemRef, patch: JobPatch) -> EditOutcome {
    settle(job_index(log, job).map(|i| {
        let job = &mut log.jobs[i];
        if let Some(number) = patch.job_number {
            job.job_number = number;
        }
        if let Some(account) = patch.customer_account {
            job.customer_account = account;
        }
        EditOutcome::Applied
    }))
}

/// Add a drop unless the job already uses every compartment
pub fn add_drop(
    log: &mut WorkLog,
    allocator: &CompartmentAllocator,
    job: &ItemRef,
    draft: DropDraft,
) -> EditOutcome {
    settle(try_add_drop(log, allocator, job, draft))
}

fn try_add_drop(
    log: &mut WorkLog,
    allocator: &CompartmentAllocator,
    job: &ItemRef,
    draft: DropDraft,
) -> Step<EditOutcome> {
    let at = job_index(log, job)?;
    let job = &mut log.jobs[at];
    if !allocator.can_add_drop(job) {
        return Err(EditOutcome::refused(Refusal::CompartmentsExhausted));
    }
    let delivery = DeliveryDrop {
        id: tanklog_types::new_id(),
        customer_name: draft
            .customer_name
            .unwrap_or_else(|| job.customer_account.clone()),
        delivery_address: draft.delivery_address.unwrap_or_default(),
        cargos: Vec::new(),
    };
    let id = delivery.id.clone();
    job.drops.push(delivery);
    Ok(EditOutcome::Created { id })
}

/// Remove a drop and release the compartments its cargo held
pub fn remove_drop(log: &mut WorkLog, job: &ItemRef, drop: &ItemRef) -> EditOutcome {
    settle(try_remove_drop(log, job, drop))
}

fn try_remove_drop(log: &mut WorkLog, job: &ItemRef, drop: &ItemRef) -> Step<EditOutcome> {
    let at = job_index(log, job)?;
    let job = &mut log.jobs[at];
    let drop_at = drop_index(job, drop)?;
    job.drops.remove(drop_at);
    Ok(EditOutcome::Applied)
}

pub fn update_drop(log: &mut WorkLog, job: &ItemRef, drop: &ItemRef, patch: DropPatch) -> EditOutcome {
    settle(try_update_drop(log, job, drop, patch))
}

fn try_update_drop(
    log: &mut WorkLog,
    job: &ItemRef,
    drop: &ItemRef,
    patch: DropPatch,
) -> Step<EditOutcome> {
    let at = job_index(log, job)?;
    let job = &mut log.jobs[at];
    let drop_at = drop_index(job, drop)?;
    let delivery = &mut job.drops[drop_at];
    if let Some(name) = patch.customer_name {
        delivery.customer_name = name;
    }
    if let Some(address) = patch.delivery_address {
        delivery.delivery_address = address;
    }
    Ok(EditOutcome::Applied)
}

/// Load a cargo into a drop.
///
/// Without an explicit compartment the lowest free one is used; an explicit
/// compartment must not be held by another cargo of the same job.
pub fn add_cargo(
    log: &mut WorkLog,
    allocator: &CompartmentAllocator,
    job: &ItemRef,
    drop: &ItemRef,
    draft: CargoDraft,
) -> EditOutcome {
    settle(try_add_cargo(log, allocator, job, drop, draft))
}

fn try_add_cargo(
    log: &mut WorkLog,
    allocator: &CompartmentAllocator,
    job: &ItemRef,
    drop: &ItemRef,
    draft: CargoDraft,
) -> Step<EditOutcome> {
    let at = job_index(log, job)?;
    let job = &mut log.jobs[at];
    let drop_at = drop_index(job, drop)?;
    let liters = check_liters(draft.liters.unwrap_or(0.0))?;

    let compartment = match draft.compartment {
        Some(c) if allocator.is_compartment_selectable(job, c, None) => c,
        Some(c) => {
            return Err(EditOutcome::refused(Refusal::CompartmentUnavailable {
                compartment: c,
            }))
        }
        None => allocator
            .next_free_compartment(job)
            .ok_or_else(|| EditOutcome::refused(Refusal::CompartmentsExhausted))?,
    };

    let cargo = Cargo::new(draft.cargo_type.unwrap_or_default(), liters, compartment);
    let id = cargo.id.clone();
    job.drops[drop_at].cargos.push(cargo);
    Ok(EditOutcome::Created { id })
}

/// Remove a cargo, freeing its compartment
pub fn remove_cargo(log: &mut WorkLog, job: &ItemRef, drop: &ItemRef, cargo: &ItemRef) -> EditOutcome {
    settle(try_remove_cargo(log, job, drop, cargo))
}

fn try_remove_cargo(
    log: &mut WorkLog,
    job: &ItemRef,
    drop: &ItemRef,
    cargo: &ItemRef,
) -> Step<EditOutcome> {
    let at = job_index(log, job)?;
    let job = &mut log.jobs[at];
    let drop_at = drop_index(job, drop)?;
    let delivery = &mut job.drops[drop_at];
    let cargo_at = cargo_index(delivery, cargo)?;
    delivery.cargos.remove(cargo_at);
    Ok(EditOutcome::Applied)
}

/// Change a cargo's product, volume or compartment.
///
/// The patch is applied all-or-nothing.
pub fn update_cargo(
    log: &mut WorkLog,
    allocator: &CompartmentAllocator,
    job: &ItemRef,
    drop: &ItemRef,
    cargo: &ItemRef,
    patch: CargoPatch,
) -> EditOutcome {
    settle(try_update_cargo(log, allocator, job, drop, cargo, patch))
}

fn try_update_cargo(
    log: &mut WorkLog,
    allocator: &CompartmentAllocator,
    job: &ItemRef,
    drop: &ItemRef,
    cargo: &ItemRef,
    patch: CargoPatch,
) -> Step<EditOutcome> {
    let at = job_index(log, job)?;
    let job = &mut log.jobs[at];
    let drop_at = drop_index(job, drop)?;
    let cargo_at = cargo_index(&job.drops[drop_at], cargo)?;
    let cargo_id = job.drops[drop_at].cargos[cargo_at].id.clone();

    let liters = patch.liters.map(check_liters).transpose()?;
    if let Some(c) = patch.compartment {
        if !allocator.is_compartment_selectable(job, c, Some(&cargo_id)) {
            return Err(EditOutcome::refused(Refusal::CompartmentUnavailable {
                compartment: c,
            }));
        }
    }

    let target = &mut job.drops[drop_at].cargos[cargo_at];
    if let Some(cargo_type) = patch.cargo_type {
        target.cargo_type = cargo_type;
    }
    if let Some(liters) = liters {
        target.liters = liters;
    }
    if let Some(c) = patch.compartment {
        target.compartment = c;
    }
    Ok(EditOutcome::Applied)
}

/// Select driver, truck and trailer. Ids are stored as given.
pub fn set_assignment(log: &mut WorkLog, assignment: Assignment) -> EditOutcome {
    if let Some(id) = assignment.driver_id {
        log.driver_id = non_empty(id);
    }
    if let Some(id) = assignment.truck_id {
        log.truck_id = non_empty(id);
    }
    if let Some(id) = assignment.trailer_id {
        log.trailer_id = non_empty(id);
    }
    EditOutcome::Applied
}

pub fn set_shift(log: &mut WorkLog, patch: ShiftPatch) -> EditOutcome {
    if let Some(start) = patch.start_time {
        log.start_time = start;
    }
    if let Some(end) = patch.end_time {
        log.end_time = end;
    }
    EditOutcome::Applied
}

pub fn set_notes(log: &mut WorkLog, notes: Option<String>) -> EditOutcome {
    log.notes = notes.and_then(non_empty);
    EditOutcome::Applied
}
