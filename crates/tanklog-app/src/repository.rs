//! Repository adapters for persistence layer

use std::path::PathBuf;

use tanklog_infra::persistence::FileStateRepository;
use tanklog_types::Result;

use crate::config::Config;
use crate::session::Session;

/// Open file-based state repository
pub fn open_state_repo(config: &Config) -> Result<FileStateRepository> {
    let data_dir = config.data_dir()?;
    FileStateRepository::open(data_dir)
}

/// Open file-based state repository at a custom directory
pub fn open_state_repo_at(data_dir: PathBuf) -> Result<FileStateRepository> {
    FileStateRepository::open(data_dir)
}

/// Open a session on the configured data directory
pub fn open_session(config: &Config) -> Result<Session<FileStateRepository>> {
    Session::open(open_state_repo(config)?)
}
