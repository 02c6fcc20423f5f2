//! Domain services

pub mod compartments;
pub mod duration;
pub mod load_check;
pub mod log_editor;

pub use compartments::CompartmentAllocator;
pub use duration::{compute_duration, format_minutes, log_duration, total_shift_minutes, ShiftDuration};
pub use load_check::{
    check_compartment_loads, compartment_totals, job_liters, total_liters, CompartmentLoad,
};
