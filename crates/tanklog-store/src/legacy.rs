//! Lenient decode of older snapshot shapes
//!
//! Earlier versions stored each drop with a single product directly on it
//! (`cargoType`/`liters`/`compartment`) instead of a `cargos` list, and did
//! not always write ids, job numbers or customer fields. These structs accept
//! any of those shapes and convert them to the current schema.
//!
//! Decoding never fails on content: a field of the wrong type is dropped and
//! falls back to its default, and an unreadable list element is skipped, so
//! one bad value cannot cost the rest of the snapshot.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use tanklog_types::{
    new_id, parse_date, AppState, Cargo, CargoType, ClockTime, DeliveryDrop, Driver, Job,
    Trailer, Truck, WorkLog, DEFAULT_COMPARTMENT_COUNT, DEFAULT_MAX_PER_COMPARTMENT_LITERS,
};

fn from_lenient<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable field in saved state");
            None
        }
    }
}

/// Any field: its value, or `None` when it has the wrong type
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Value::deserialize(deserializer).map(from_lenient::<T>)
}

/// Numeric field that may also have been written as a string (`"2"`)
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromStr,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => raw.trim().parse().ok().or_else(|| {
            warn!(value = %raw, "ignoring non-numeric value in saved state");
            None
        }),
        other => from_lenient(other),
    })
}

/// List field; elements that cannot be read are skipped
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Array(items) => Some(items.into_iter().filter_map(from_lenient::<T>).collect()),
        other => {
            warn!(found = %other, "expected a list in saved state, ignoring");
            None
        }
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LegacyState {
    #[serde(deserialize_with = "lenient_list")]
    pub drivers: Option<Vec<LegacyDriver>>,
    #[serde(deserialize_with = "lenient_list")]
    pub trucks: Option<Vec<LegacyTruck>>,
    #[serde(deserialize_with = "lenient_list")]
    pub trailers: Option<Vec<LegacyTrailer>>,
    #[serde(deserialize_with = "lenient_list")]
    pub work_logs: Option<Vec<LegacyWorkLog>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LegacyDriver {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LegacyTruck {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub plate: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LegacyTrailer {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub plate: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub compartment_count: Option<u32>,
    #[serde(deserialize_with = "lenient_number")]
    pub max_per_compartment_liters: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LegacyWorkLog {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub driver_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub truck_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub trailer_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub start_time: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub end_time: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub jobs: Option<Vec<LegacyJob>>,
    #[serde(deserialize_with = "lenient")]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LegacyJob {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub job_number: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub customer_account: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub drops: Option<Vec<LegacyDrop>>,
}

/// A drop in either shape: with a `cargos` list, or carrying one product
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LegacyDrop {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub customer_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub customer_account: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub delivery_address: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub cargos: Option<Vec<LegacyCargo>>,
    #[serde(deserialize_with = "lenient")]
    pub cargo_type: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub liters: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub compartment: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LegacyCargo {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub cargo_type: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub liters: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub compartment: Option<u32>,
}

fn id_or_new(id: Option<String>) -> String {
    id.filter(|s| !s.is_empty()).unwrap_or_else(new_id)
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn cargo_type(raw: Option<&str>) -> CargoType {
    match raw {
        Some(key) => CargoType::from_key(key).unwrap_or_else(|| {
            warn!(cargo_type = key, "unknown cargo type in saved state, using diesel");
            CargoType::Diesel
        }),
        None => CargoType::Diesel,
    }
}

fn clock(raw: Option<String>, field: &str) -> Option<ClockTime> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    match raw.parse() {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(field, error = %e, "dropping unreadable shift time");
            None
        }
    }
}

fn liters(raw: Option<f64>) -> f64 {
    raw.filter(|l| l.is_finite() && *l >= 0.0).unwrap_or(0.0)
}

/// Compartment as stored, or the 1-based `position` when absent or zero
fn compartment(raw: Option<u32>, position: usize) -> u32 {
    raw.filter(|c| *c > 0)
        .unwrap_or_else(|| u32::try_from(position + 1).unwrap_or(u32::MAX))
}

impl LegacyCargo {
    fn into_current(self, index: usize) -> Cargo {
        Cargo {
            id: id_or_new(self.id),
            cargo_type: cargo_type(self.cargo_type.as_deref()),
            liters: liters(self.liters),
            compartment: compartment(self.compartment, index),
        }
    }
}

impl LegacyDrop {
    fn into_current(self, index: usize, job_account: &str) -> DeliveryDrop {
        let customer_name = first_non_empty([
            self.customer_name.as_deref(),
            self.customer_account.as_deref(),
            Some(job_account),
        ]);
        let cargos = match self.cargos {
            Some(cargos) => cargos
                .into_iter()
                .enumerate()
                .map(|(i, c)| c.into_current(i))
                .collect(),
            // Single-product drop: lift its product into a one-element list
            None => vec![Cargo {
                id: new_id(),
                cargo_type: cargo_type(self.cargo_type.as_deref()),
                liters: liters(self.liters),
                compartment: compartment(self.compartment, index),
            }],
        };
        DeliveryDrop {
            id: id_or_new(self.id),
            customer_name,
            delivery_address: self.delivery_address.unwrap_or_default(),
            cargos,
        }
    }
}

impl LegacyJob {
    fn into_current(self) -> Job {
        let customer_account = self.customer_account.unwrap_or_default();
        let drops = self
            .drops
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, d)| d.into_current(i, &customer_account))
            .collect();
        Job {
            id: id_or_new(self.id),
            job_number: self.job_number.unwrap_or_default(),
            customer_account,
            drops,
        }
    }
}

impl LegacyWorkLog {
    /// `None` when the log has no readable date
    fn into_current(self) -> Option<WorkLog> {
        let raw_date = self.date.unwrap_or_default();
        let date = match parse_date(&raw_date) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "skipping saved work log without a usable date");
                return None;
            }
        };
        Some(WorkLog {
            id: id_or_new(self.id),
            date,
            driver_id: self.driver_id.filter(|s| !s.is_empty()),
            truck_id: self.truck_id.filter(|s| !s.is_empty()),
            trailer_id: self.trailer_id.filter(|s| !s.is_empty()),
            start_time: clock(self.start_time, "startTime"),
            end_time: clock(self.end_time, "endTime"),
            jobs: self
                .jobs
                .unwrap_or_default()
                .into_iter()
                .map(LegacyJob::into_current)
                .collect(),
            notes: self.notes.filter(|s| !s.is_empty()),
        })
    }
}

impl LegacyState {
    pub(crate) fn into_current(self) -> AppState {
        let drivers = self
            .drivers
            .unwrap_or_default()
            .into_iter()
            .map(|d| Driver {
                id: id_or_new(d.id),
                name: d.name.unwrap_or_default(),
            })
            .collect();
        let trucks = self
            .trucks
            .unwrap_or_default()
            .into_iter()
            .map(|t| Truck {
                id: id_or_new(t.id),
                plate: t.plate.unwrap_or_default(),
            })
            .collect();
        let trailers = self
            .trailers
            .unwrap_or_default()
            .into_iter()
            .map(|t| Trailer {
                id: id_or_new(t.id),
                plate: t.plate.unwrap_or_default(),
                compartment_count: t
                    .compartment_count
                    .filter(|c| *c > 0)
                    .unwrap_or(DEFAULT_COMPARTMENT_COUNT),
                max_per_compartment_liters: t
                    .max_per_compartment_liters
                    .filter(|l| l.is_finite() && *l > 0.0)
                    .unwrap_or(DEFAULT_MAX_PER_COMPARTMENT_LITERS),
            })
            .collect();
        let work_logs = self
            .work_logs
            .unwrap_or_default()
            .into_iter()
            .filter_map(LegacyWorkLog::into_current)
            .collect();

        AppState {
            drivers,
            trucks,
            trailers,
            work_logs,
        }
    }
}
