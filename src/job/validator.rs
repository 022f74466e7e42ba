//! Job Validation
//!
//! Structural checks on a job definition, and an optional comparison of
//! its inputs against a process description.

use std::collections::HashSet;

use log::{debug, info, warn};
use url::Url;

use crate::error::{Result, WpsError};
use crate::model::{convert, DataKind, Process};
use crate::request::RawFragment;

use super::model::{InputSpec, JobSpec};

/// Validation error types for user-friendly error messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyProcess,
    InvalidUrl { field: String, url: String },
    EmptyInputId,
    DuplicateInputId(String),
    MissingValue(String),
    MultipleValueKinds(String),
    InvalidFragment { input: String, reason: String },
    EmptyOutput,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProcess => write!(f, "Job has no process identifier"),
            Self::InvalidUrl { field, url } => write!(f, "Invalid {} URL: '{}'", field, url),
            Self::EmptyInputId => write!(f, "An input has an empty or whitespace-only ID"),
            Self::DuplicateInputId(id) => write!(
                f,
                "Duplicate input ID: '{}' (use a value list to repeat an input)",
                id
            ),
            Self::MissingValue(id) => write!(f, "Input '{}' has no value", id),
            Self::MultipleValueKinds(id) => write!(
                f,
                "Input '{}' sets more than one of value, xml, wfs, polygons",
                id
            ),
            Self::InvalidFragment { input, reason } => {
                write!(f, "Input '{}' has malformed xml: {}", input, reason)
            }
            Self::EmptyOutput => write!(f, "Output identifier is empty"),
        }
    }
}

/// Validates a single input's fields.
fn validate_input(input: &InputSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.id.trim().is_empty() {
        errors.push(ValidationError::EmptyInputId);
        return errors;
    }

    match input.kind_count() {
        0 => errors.push(ValidationError::MissingValue(input.id.clone())),
        1 => {}
        _ => errors.push(ValidationError::MultipleValueKinds(input.id.clone())),
    }

    if let Some(xml) = &input.xml {
        if let Err(e) = RawFragment::parse(xml.as_str()) {
            errors.push(ValidationError::InvalidFragment {
                input: input.id.clone(),
                reason: e.to_string(),
            });
        }
    }

    if let Some(wfs) = &input.wfs {
        if Url::parse(&wfs.url).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field: format!("input '{}' WFS", input.id),
                url: wfs.url.clone(),
            });
        }
    }

    if let Some(polygons) = &input.polygons {
        for (i, ring) in polygons.iter().enumerate() {
            if ring.len() < 4 || ring.first() != ring.last() {
                warn!(
                    "Input '{}': polygon {} is not a closed ring of at least 4 positions",
                    input.id, i
                );
            }
        }
    }

    errors
}

/// Collects every validation error in a job.
pub fn collect_errors(job: &JobSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if job.process.trim().is_empty() {
        errors.push(ValidationError::EmptyProcess);
    }

    if Url::parse(&job.url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "service".to_string(),
            url: job.url.clone(),
        });
    }

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for input in &job.inputs {
        if !input.id.trim().is_empty() && !seen_ids.insert(input.id.as_str()) {
            errors.push(ValidationError::DuplicateInputId(input.id.clone()));
        }
        errors.extend(validate_input(input));
    }

    if matches!(job.output.as_deref(), Some(o) if o.trim().is_empty()) {
        errors.push(ValidationError::EmptyOutput);
    }

    errors
}

/// Validates a job definition.
///
/// Performs the following checks:
/// 1. Process identifier is not empty
/// 2. Service and WFS URLs parse
/// 3. Input IDs are present and unique
/// 4. Each input sets exactly one value kind
/// 5. Raw XML fragments are well-formed
pub fn validate_job(job: &JobSpec) -> Result<()> {
    info!("Validating job for process '{}'", job.process);

    let errors = collect_errors(job);
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(WpsError::InvalidJob(message));
    }

    if job.poll_interval == 0 {
        warn!("poll_interval is 0: status will be polled without pause");
    }

    debug!("Job has {} inputs", job.inputs.len());
    Ok(())
}

/// Compares job inputs with a process description.
///
/// Occurrence and value constraints are the server's to enforce, so
/// mismatches are reported as warnings rather than errors.
///
/// # Returns
///
/// One message per mismatch, in input order.
pub fn check_against_process(job: &JobSpec, process: &Process) -> Vec<String> {
    let mut warnings = Vec::new();

    for input in &job.inputs {
        let Some(declared) = process.input(&input.id) else {
            warnings.push(format!(
                "Input '{}' is not declared by process '{}'",
                input.id, process.identifier
            ));
            continue;
        };

        match &declared.descriptor.kind {
            Some(DataKind::Literal(literal)) => {
                if !input.value.is_empty() && !literal.allowed_values.is_empty() {
                    for value in &input.value {
                        let typed = convert(&literal.data_type, value);
                        if !literal.allowed_values.contains(&typed) {
                            warnings.push(format!(
                                "Input '{}': value '{}' is not among the allowed values",
                                input.id, value
                            ));
                        }
                    }
                }
                if input.value.is_empty() {
                    warnings.push(format!("Input '{}' expects a literal value", input.id));
                }
            }
            Some(DataKind::Complex(_)) if !input.value.is_empty() => {
                warnings.push(format!("Input '{}' expects complex data", input.id));
            }
            _ => {}
        }

        let occurrences = input.value.len().max(1);
        if let Some(max) = declared.max_occurs {
            if occurrences > max as usize {
                warnings.push(format!(
                    "Input '{}' given {} times, at most {} allowed",
                    input.id, occurrences, max
                ));
            }
        }
    }

    for declared in &process.inputs {
        let required = declared.min_occurs.unwrap_or(0) > 0;
        if required && !job.inputs.iter().any(|i| i.id == declared.identifier()) {
            warnings.push(format!("Required input '{}' is missing", declared.identifier()));
        }
    }

    for warning in &warnings {
        warn!("{}", warning);
    }
    warnings
}
