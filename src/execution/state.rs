//! Execution State Persistence
//!
//! A small JSON snapshot of an asynchronous job, so polling can resume after
//! the client restarts. The snapshot records where to poll, not the job's
//! results: those are re-read from the status document.
//!
//! State is saved to `{dir}/{key}.state`. The key names one submitted job
//! (the CLI derives it from the job file path), so two jobs running the
//! same process keep separate snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::ExecutionStatus;

/// Persistent state for an execution.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExecutionState {
    /// Service endpoint the job was submitted to
    pub url: String,

    /// Protocol version used for the job
    pub version: String,

    /// Identifier of the executed process
    pub process: String,

    /// URL of the stored status document, if the server provided one
    pub status_location: Option<String>,

    /// Last known status
    pub status: ExecutionStatus,

    /// When the execution was created
    pub created_at: DateTime<Utc>,

    /// Last time the state was updated
    pub updated_at: DateTime<Utc>,
}

impl ExecutionState {
    /// Creates a new state for a freshly submitted process.
    pub fn new(url: &str, version: &str, process: &str) -> Self {
        let now = Utc::now();
        Self {
            url: url.to_string(),
            version: version.to_string(),
            process: process.to_string(),
            status_location: None,
            status: ExecutionStatus::Unset,
            created_at: now,
            updated_at: now,
        }
    }

    /// Saves the state under `dir` for the job named by `key`, creating
    /// the directory if needed.
    ///
    /// # Returns
    ///
    /// The path of the written state file.
    pub fn save(&self, dir: &Path, key: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let state_file = Self::state_file_path_for(dir, key);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&state_file, json)?;

        info!("Saved execution state to {}", state_file.display());
        Ok(state_file)
    }

    /// Loads the state saved for a job key.
    ///
    /// Returns an error if no state file exists or it can't be read.
    pub fn load(dir: &Path, key: &str) -> Result<Self> {
        let state_file = Self::state_file_path_for(dir, key);

        let content = fs::read_to_string(&state_file)?;
        let state: ExecutionState = serde_json::from_str(&content)?;

        info!("Loaded execution state from {}", state_file.display());
        info!("Last known status: {}", state.status);

        Ok(state)
    }

    /// Returns the state file path for a job key.
    pub fn state_file_path_for(dir: &Path, key: &str) -> PathBuf {
        let stem: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let stem = stem.trim_matches(['_', '.']);
        let stem = if stem.is_empty() { "execution" } else { stem };

        dir.join(format!("{}.state", stem))
    }

    /// Derives a job key from a job file path.
    ///
    /// The path is made absolute when it exists, so the same file reached
    /// through different relative paths maps to one key.
    pub fn key_for_job(job_path: &Path) -> String {
        let path = fs::canonicalize(job_path).unwrap_or_else(|_| job_path.to_path_buf());
        path.to_string_lossy().into_owned()
    }

    /// Records a newly observed status.
    pub fn update(&mut self, status: ExecutionStatus, status_location: Option<String>) {
        self.status = status;
        if status_location.is_some() {
            self.status_location = status_location;
        }
        self.updated_at = Utc::now();
    }

    /// Returns true if the job can still be polled.
    ///
    /// An unrecognised status counts as resumable: polling again is the
    /// only way to learn more.
    pub fn is_resumable(&self) -> bool {
        self.status_location.is_some() && !self.status.is_complete().unwrap_or(false)
    }

    /// Deletes the state file of a job key.
    pub fn delete(dir: &Path, key: &str) -> Result<()> {
        let state_file = Self::state_file_path_for(dir, key);
        if state_file.exists() {
            fs::remove_file(&state_file)?;
            info!("Deleted state file: {}", state_file.display());
        }
        Ok(())
    }
}
