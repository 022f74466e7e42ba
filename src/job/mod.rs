//! Job Definition Module
//!
//! Job files describe a process execution to run from the command line.
//!
//! # Structure
//!
//! - [`model`]: Job and input definitions (YAML)
//! - [`parser`]: Loading and saving job files
//! - [`validator`]: Structural checks and comparison with a process description

pub mod model;
pub mod parser;
pub mod validator;

pub use model::{InputSpec, JobSpec};
pub use parser::{load_job, parse_job, save_job};
pub use validator::{check_against_process, validate_job, ValidationError};
