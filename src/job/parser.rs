//! Job Parser
//!
//! Loading and saving job definitions as YAML.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::{Result, WpsError};

use super::model::JobSpec;
use super::validator::validate_job;

/// Parses and validates a job definition from YAML text.
pub fn parse_job(yaml: &str) -> Result<JobSpec> {
    let job: JobSpec = serde_yaml::from_str(yaml).map_err(|e| {
        WpsError::InvalidJob(format!("Failed to parse job YAML: {}. Check the file format.", e))
    })?;

    info!(
        "Parsed job: process '{}', {} inputs",
        job.process,
        job.inputs.len()
    );

    validate_job(&job)?;
    Ok(job)
}

/// Loads a job from a YAML file.
///
/// # Arguments
///
/// * `path` - Path to the job YAML file
///
/// # Returns
///
/// * `Ok(JobSpec)` - Successfully loaded and validated job
/// * `Err` - Read, parse or validation error
///
/// # Example
///
/// ```rust,no_run
/// use wpsclient::job::load_job;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let job = load_job("statistics.yaml")?;
///     println!("Process {} with {} inputs", job.process, job.inputs.len());
///     Ok(())
/// }
/// ```
pub fn load_job(path: impl AsRef<Path>) -> Result<JobSpec> {
    let path = path.as_ref();
    info!("Loading job from: {}", path.display());

    let yaml_content = fs::read_to_string(path)?;
    debug!("YAML content loaded ({} bytes)", yaml_content.len());

    parse_job(&yaml_content)
}

/// Saves a job to a YAML file.
pub fn save_job(job: &JobSpec, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let yaml_content = serde_yaml::to_string(job)?;
    fs::write(path, yaml_content)?;
    info!("Job saved to: {}", path.display());
    Ok(())
}
