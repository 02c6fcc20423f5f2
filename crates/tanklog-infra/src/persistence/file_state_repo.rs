//! File-based state repository implementation

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use tanklog_domain::repository::StateRepository;
use tanklog_store::normalize;
use tanklog_types::{AppState, Error, Result};

/// Snapshot file name inside the data directory
pub const STATE_FILE_NAME: &str = "fuel-log-state-v1.json";

/// Stores the whole application state as one JSON file.
///
/// Every save rewrites the file; there is no partial update.
pub struct FileStateRepository {
    store_path: PathBuf,
}

impl FileStateRepository {
    /// Open the repository in `store_dir`, creating the directory if needed
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join(STATE_FILE_NAME);
        Ok(Self { store_path })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

impl StateRepository for FileStateRepository {
    fn load(&self) -> std::result::Result<AppState, Error> {
        let raw = match fs::read_to_string(&self.store_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.store_path.display(), "no saved state, starting fresh");
                return Ok(AppState::default());
            }
            Err(e) => return Err(e.into()),
        };
        debug!(path = %self.store_path.display(), bytes = raw.len(), "loaded saved state");
        Ok(normalize(&raw))
    }

    fn save(&self, state: &AppState) -> std::result::Result<(), Error> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.store_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush()?;
        debug!(path = %self.store_path.display(), logs = state.work_logs.len(), "saved state");
        Ok(())
    }
}
