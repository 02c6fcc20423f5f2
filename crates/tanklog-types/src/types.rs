//! Work log entities and the persisted application state

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

/// Compartment count used when no trailer is known
pub const DEFAULT_COMPARTMENT_COUNT: u32 = 6;

/// Largest compartment count a trailer may have
pub const MAX_COMPARTMENT_COUNT: u32 = 32;

/// Per-compartment capacity given to quick-added trailers
pub const DEFAULT_MAX_PER_COMPARTMENT_LITERS: f64 = 7200.0;

/// Compartment count limited to `1..=MAX_COMPARTMENT_COUNT`; zero means the default
pub fn bounded_compartment_count(count: u32) -> u32 {
    match count {
        0 => DEFAULT_COMPARTMENT_COUNT,
        c => c.min(MAX_COMPARTMENT_COUNT),
    }
}

/// Generate a fresh entity id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Fuel product carried in a compartment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum CargoType {
    #[default]
    Diesel,
    Petrol,
    DieselPlus,
    PetrolPlus,
    Kerosene,
    GasOil,
}

impl CargoType {
    pub const ALL: [CargoType; 6] = [
        CargoType::Diesel,
        CargoType::Petrol,
        CargoType::DieselPlus,
        CargoType::PetrolPlus,
        CargoType::Kerosene,
        CargoType::GasOil,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CargoType::Diesel => "Diesel",
            CargoType::Petrol => "Petrol",
            CargoType::DieselPlus => "Diesel Plus",
            CargoType::PetrolPlus => "Petrol Plus",
            CargoType::Kerosene => "Kerosene",
            CargoType::GasOil => "Gas Oil",
        }
    }

    /// Persisted key (`diesel_plus`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            CargoType::Diesel => "diesel",
            CargoType::Petrol => "petrol",
            CargoType::DieselPlus => "diesel_plus",
            CargoType::PetrolPlus => "petrol_plus",
            CargoType::Kerosene => "kerosene",
            CargoType::GasOil => "gas_oil",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for CargoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub id: String,
    pub plate: String,
}

/// Tanker trailer; its compartments are addressed `1..=compartment_count`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trailer {
    pub id: String,
    pub plate: String,
    pub compartment_count: u32,
    pub max_per_compartment_liters: f64,
}

/// A single product load sitting in one compartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    pub id: String,
    pub cargo_type: CargoType,
    pub liters: f64,
    /// 1-based compartment number
    pub compartment: u32,
}

impl Cargo {
    pub fn new(cargo_type: CargoType, liters: f64, compartment: u32) -> Self {
        Self {
            id: new_id(),
            cargo_type,
            liters,
            compartment,
        }
    }
}

/// One delivery stop within a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDrop {
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub delivery_address: String,
    /// Required in the current schema; its absence marks a legacy snapshot
    pub cargos: Vec<Cargo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub job_number: String,
    #[serde(default)]
    pub customer_account: String,
    #[serde(default)]
    pub drops: Vec<DeliveryDrop>,
}

impl Job {
    /// Every cargo across all drops of the job
    pub fn cargos(&self) -> impl Iterator<Item = &Cargo> {
        self.drops.iter().flat_map(|d| d.cargos.iter())
    }
}

/// Everything recorded for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLog {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkLog {
    /// Blank log created the first time a date is selected
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            date,
            driver_id: None,
            truck_id: None,
            trailer_id: None,
            start_time: None,
            end_time: None,
            jobs: Vec::new(),
            notes: None,
        }
    }
}

/// Whole persisted snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub trucks: Vec<Truck>,
    #[serde(default)]
    pub trailers: Vec<Trailer>,
    #[serde(default)]
    pub work_logs: Vec<WorkLog>,
}

impl AppState {
    pub fn default_drivers() -> Vec<Driver> {
        vec![Driver {
            id: new_id(),
            name: "Primary Driver".to_string(),
        }]
    }

    pub fn default_trucks() -> Vec<Truck> {
        vec![Truck {
            id: new_id(),
            plate: "TRK-001".to_string(),
        }]
    }

    pub fn default_trailers() -> Vec<Trailer> {
        vec![Trailer {
            id: new_id(),
            plate: "TRL-001".to_string(),
            compartment_count: DEFAULT_COMPARTMENT_COUNT,
            max_per_compartment_liters: DEFAULT_MAX_PER_COMPARTMENT_LITERS,
        }]
    }

    pub fn driver(&self, id: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    pub fn truck(&self, id: &str) -> Option<&Truck> {
        self.trucks.iter().find(|t| t.id == id)
    }

    pub fn trailer(&self, id: &str) -> Option<&Trailer> {
        self.trailers.iter().find(|t| t.id == id)
    }

    /// Trailer governing a log: its own selection, else the first known trailer
    pub fn trailer_for(&self, log: &WorkLog) -> Option<&Trailer> {
        log.trailer_id
            .as_deref()
            .and_then(|id| self.trailer(id))
            .or_else(|| self.trailers.first())
    }

    /// Compartment count in effect for a log
    pub fn compartment_count_for(&self, log: &WorkLog) -> u32 {
        self.trailer_for(log)
            .map(|t| bounded_compartment_count(t.compartment_count))
            .unwrap_or(DEFAULT_COMPARTMENT_COUNT)
    }
}

impl Default for AppState {
    /// Built-in starter state: one driver, one truck, one 6-compartment trailer
    fn default() -> Self {
        Self {
            drivers: Self::default_drivers(),
            trucks: Self::default_trucks(),
            trailers: Self::default_trailers(),
            work_logs: Vec::new(),
        }
    }
}
