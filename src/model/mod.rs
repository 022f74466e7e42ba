//! WPS Data Model
//!
//! Typed value objects built from WPS documents: process descriptions,
//! declared and returned inputs/outputs, protocol exceptions, and the
//! execution status.
//!
//! # Structure
//!
//! - [`typed`]: Literal text to primitive value conversion
//! - [`io`]: Inputs, outputs and their data descriptors
//! - [`process`]: Process descriptions
//! - [`exception`]: Server-reported exceptions
//! - [`status`]: Execution status state machine

pub mod exception;
pub mod io;
pub mod process;
pub mod status;
pub mod typed;

pub use exception::WpsException;
pub use io::{
    ComplexDataDescriptor, ComplexDescriptor, DataKind, Descriptor, Input, InputData,
    LiteralDescriptor, Output, OutputData,
};
pub use process::Process;
pub use status::ExecutionStatus;
pub use typed::{convert, TypedValue};
