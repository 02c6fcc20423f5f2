//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod file_state_repo;

pub use file_state_repo::{FileStateRepository, STATE_FILE_NAME};
