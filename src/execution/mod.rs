//! Process Execution Module
//!
//! The execution engine: submitting Execute requests, parsing the server's
//! responses, tracking job status and retrieving outputs.
//!
//! # Architecture
//!
//! - [`job`]: The [`Execution`] controller
//! - [`response`]: ExecuteResponse / ExceptionReport parsing
//! - [`output`]: Output file naming and retrieval results
//! - [`state`]: Resume snapshots
//! - [`timeline`]: Observed status history

pub mod job;
pub mod output;
pub mod response;
pub mod state;
pub mod timeline;

#[cfg(test)]
mod fixtures;

pub use job::{Execution, DEFAULT_POLL_INTERVAL};
pub use output::{derive_file_name, OutputResult};
pub use state::ExecutionState;
pub use timeline::{StatusEvent, StatusTimeline};
