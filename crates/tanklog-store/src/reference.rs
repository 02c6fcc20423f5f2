//! Quick-add of drivers, trucks and trailers
//!
//! Reference data is append-only.

use tanklog_types::{
    bounded_compartment_count, new_id, AppState, Driver, Trailer, Truck,
    DEFAULT_COMPARTMENT_COUNT, DEFAULT_MAX_PER_COMPARTMENT_LITERS,
};

pub fn add_driver(mut state: AppState, name: &str) -> (AppState, Driver) {
    let driver = Driver {
        id: new_id(),
        name: name.trim().to_string(),
    };
    state.drivers.push(driver.clone());
    (state, driver)
}

pub fn add_truck(mut state: AppState, plate: &str) -> (AppState, Truck) {
    let truck = Truck {
        id: new_id(),
        plate: plate.trim().to_string(),
    };
    state.trucks.push(truck.clone());
    (state, truck)
}

/// Add a trailer; missing or zero sizes fall back to 6 x 7200 L and the
/// compartment count is capped at `MAX_COMPARTMENT_COUNT`
pub fn add_trailer(
    mut state: AppState,
    plate: &str,
    compartment_count: Option<u32>,
    max_per_compartment_liters: Option<f64>,
) -> (AppState, Trailer) {
    let trailer = Trailer {
        id: new_id(),
        plate: plate.trim().to_string(),
        compartment_count: bounded_compartment_count(
            compartment_count.unwrap_or(DEFAULT_COMPARTMENT_COUNT),
        ),
        max_per_compartment_liters: max_per_compartment_liters
            .filter(|l| l.is_finite() && *l > 0.0)
            .unwrap_or(DEFAULT_MAX_PER_COMPARTMENT_LITERS),
    };
    state.trailers.push(trailer.clone());
    (state, trailer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_driver_appends() {
        let (state, driver) = add_driver(AppState::default(), "  Sam Reyes ");
        assert_eq!(driver.name, "Sam Reyes");
        assert_eq!(state.drivers.len(), 2);
        assert_eq!(state.drivers[1], driver);
    }

    #[test]
    fn test_add_trailer_defaults() {
        let (state, trailer) = add_trailer(AppState::default(), "TRL-002", None, Some(0.0));
        assert_eq!(trailer.compartment_count, 6);
        assert_eq!(trailer.max_per_compartment_liters, 7200.0);
        assert_eq!(state.trailers.len(), 2);

        let (_, small) = add_trailer(state, "TRL-003", Some(4), Some(5000.0));
        assert_eq!(small.compartment_count, 4);
        assert_eq!(small.max_per_compartment_liters, 5000.0);
    }

    #[test]
    fn test_add_trailer_caps_compartments() {
        let (_, big) = add_trailer(AppState::default(), "BIG", Some(4_294_967_295), None);
        assert_eq!(big.compartment_count, tanklog_types::MAX_COMPARTMENT_COUNT);
    }

    #[test]
    fn test_add_truck_appends() {
        let (state, truck) = add_truck(AppState::default(), "TRK-042");
        assert_eq!(state.trucks.last(), Some(&truck));
    }
}
