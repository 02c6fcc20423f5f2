//! Edit requests and their outcomes

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use tanklog_types::{CargoType, ClockTime};

/// Reference to a job, drop or cargo: its id, or its 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Id(String),
    Position(usize),
}

impl ItemRef {
    /// Index into `items` that this reference resolves to
    pub fn locate<T>(&self, items: &[T], id_of: impl Fn(&T) -> &str) -> Option<usize> {
        match self {
            ItemRef::Id(id) => items.iter().position(|item| id_of(item) == id.as_str()),
            ItemRef::Position(pos) => pos.checked_sub(1).filter(|i| *i < items.len()),
        }
    }
}

impl FromStr for ItemRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<usize>() {
            Ok(pos) => ItemRef::Position(pos),
            Err(_) => ItemRef::Id(s.to_string()),
        })
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRef::Id(id) => f.write_str(id),
            ItemRef::Position(pos) => write!(f, "#{}", pos),
        }
    }
}

/// Kind of item an edit could not find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Job,
    Drop,
    Cargo,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Job => write!(f, "job"),
            Target::Drop => write!(f, "drop"),
            Target::Cargo => write!(f, "cargo"),
        }
    }
}

/// Why an edit was declined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum Refusal {
    /// No compartment left for another drop or cargo
    CompartmentsExhausted,
    /// Compartment is taken by another cargo or outside the trailer
    CompartmentUnavailable { compartment: u32 },
    /// Liters must be a finite, non-negative number
    InvalidLiters,
    /// Names and plates cannot be blank
    BlankName,
    /// Trailer has more compartments than supported
    TooManyCompartments { count: u32, max: u32 },
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::CompartmentsExhausted => write!(f, "all compartments are in use"),
            Refusal::CompartmentUnavailable { compartment } => {
                write!(f, "compartment {} is not available", compartment)
            }
            Refusal::InvalidLiters => write!(f, "liters must be zero or more"),
            Refusal::BlankName => write!(f, "name cannot be blank"),
            Refusal::TooManyCompartments { count, max } => {
                write!(f, "{} compartments requested, at most {} supported", count, max)
            }
        }
    }
}

/// Result of applying an edit to a work log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum EditOutcome {
    Applied,
    Created { id: String },
    Refused { refusal: Refusal },
    NotFound { target: Target, reference: String },
}

impl EditOutcome {
    pub fn refused(refusal: Refusal) -> Self {
        EditOutcome::Refused { refusal }
    }

    pub fn not_found(target: Target, reference: &ItemRef) -> Self {
        EditOutcome::NotFound {
            target,
            reference: reference.to_string(),
        }
    }

    /// Whether the log was changed
    pub fn is_change(&self) -> bool {
        matches!(self, EditOutcome::Applied | EditOutcome::Created { .. })
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOutcome::Applied => write!(f, "updated"),
            EditOutcome::Created { id } => write!(f, "created {}", id),
            EditOutcome::Refused { refusal } => write!(f, "refused: {}", refusal),
            EditOutcome::NotFound { target, reference } => {
                write!(f, "no {} matching {}", target, reference)
            }
        }
    }
}

/// Field changes for a job; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub job_number: Option<String>,
    pub customer_account: Option<String>,
}

/// New drop; an absent customer name inherits the job's account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropDraft {
    pub customer_name: Option<String>,
    pub delivery_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropPatch {
    pub customer_name: Option<String>,
    pub delivery_address: Option<String>,
}

/// New cargo; an absent compartment takes the lowest free one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CargoDraft {
    pub cargo_type: Option<CargoType>,
    pub liters: Option<f64>,
    pub compartment: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CargoPatch {
    pub cargo_type: Option<CargoType>,
    pub liters: Option<f64>,
    pub compartment: Option<u32>,
}

/// Driver/truck/trailer selection; `Some("")` clears a field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    pub driver_id: Option<String>,
    pub truck_id: Option<String>,
    pub trailer_id: Option<String>,
}

/// Shift time changes; `Some(None)` clears a time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftPatch {
    pub start_time: Option<Option<ClockTime>>,
    pub end_time: Option<Option<ClockTime>>,
}
