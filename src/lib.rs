//! wpsclient - OGC Web Processing Service Client
//!
//! A client for WPS 1.0.0 services: builds Execute requests, submits them,
//! and tracks asynchronous jobs from submission through completion. Inputs
//! and outputs are strongly typed throughout.
//!
//! # Architecture
//!
//! The library is organized into these modules:
//!
//! - [`model`]: Typed processes, inputs, outputs, exceptions and status
//! - [`request`]: Execute request building and complex input payloads
//! - [`execution`]: The execution engine (submit, parse, poll, retrieve)
//! - [`service`]: Capabilities, process descriptions and execution for one endpoint
//! - [`transport`]: HTTP abstraction
//! - [`job`]: YAML job definitions used by the command line
//! - [`xml`]: Document reading and writing helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use wpsclient::request::InputValue;
//! use wpsclient::WebProcessingService;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wps = WebProcessingService::connect("http://host/wps/WebProcessingService")?;
//!
//!     let inputs = vec![("message", InputValue::from("hello"))];
//!     let mut execution = wps.execute("EchoProcess", &inputs, Some("OUTPUT"), None, None)?;
//!
//!     while !execution.is_complete()? {
//!         execution.check_status(None, None, Duration::from_secs(10))?;
//!     }
//!     for result in execution.get_output(None)? {
//!         println!("{:?}", result);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod execution;
pub mod job;
pub mod model;
pub mod request;
pub mod service;
pub mod transport;
pub mod xml;

// Re-export commonly used types
pub use error::{Result, WpsError};
pub use execution::{Execution, ExecutionState, OutputResult};
pub use job::{load_job, JobSpec};
pub use model::{ExecutionStatus, Process};
pub use request::{build_execute_request, InputValue};
pub use service::WebProcessingService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "wpsclient";
