//! Repository trait definitions for data persistence

use tanklog_types::{AppState, Error};

/// Whole-snapshot storage for the application state
pub trait StateRepository {
    /// Load the snapshot, normalized to the current schema
    fn load(&self) -> Result<AppState, Error>;

    /// Replace the stored snapshot
    fn save(&self, state: &AppState) -> Result<(), Error>;
}
