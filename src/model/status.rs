//! Execution Status
//!
//! The lifecycle of a submitted job as reported by the server. Transitions
//! only ever come from parsed documents; the client never advances a status
//! on its own.
//!
//! ```text
//! Unset ─► ProcessAccepted ─► ProcessStarted ◄─► ProcessPaused
//!   │                               │
//!   │                               ├─► ProcessSucceeded
//!   │                               └─► ProcessFailed
//!   └─► Exception  (ExceptionReport received)
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WpsError};

/// Status of a process execution.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    /// Nothing parsed yet
    #[default]
    Unset,
    ProcessAccepted,
    ProcessStarted,
    ProcessPaused,
    ProcessSucceeded,
    ProcessFailed,
    /// The server answered with an ExceptionReport
    Exception,
    /// A status element the client does not recognise
    Unknown(String),
}

impl ExecutionStatus {
    /// Returns true if the job has reached a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`WpsError::UnknownStatus`] for an unrecognised status, since
    /// the client cannot tell whether polling should continue.
    pub fn is_complete(&self) -> Result<bool> {
        match self {
            Self::ProcessSucceeded | Self::ProcessFailed | Self::Exception => Ok(true),
            Self::Unset | Self::ProcessAccepted | Self::ProcessStarted | Self::ProcessPaused => {
                Ok(false)
            }
            Self::Unknown(name) => Err(WpsError::UnknownStatus(name.clone())),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::ProcessSucceeded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::ProcessFailed | Self::Exception)
    }

    /// Maps the local name of a `<Status>` child element to a status.
    ///
    /// Only the five WPS 1.0.0 status elements are recognised; any other
    /// name, including the client's own `Unset`, becomes [`Self::Unknown`].
    pub fn from_element_name(name: &str) -> Self {
        match name {
            "ProcessAccepted" => Self::ProcessAccepted,
            "ProcessStarted" => Self::ProcessStarted,
            "ProcessPaused" => Self::ProcessPaused,
            "ProcessSucceeded" => Self::ProcessSucceeded,
            "ProcessFailed" => Self::ProcessFailed,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unset => "Unset",
            Self::ProcessAccepted => "ProcessAccepted",
            Self::ProcessStarted => "ProcessStarted",
            Self::ProcessPaused => "ProcessPaused",
            Self::ProcessSucceeded => "ProcessSucceeded",
            Self::ProcessFailed => "ProcessFailed",
            Self::Exception => "Exception",
            Self::Unknown(name) => name,
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = Infallible;

    /// Parses a saved status name. Never fails.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "Unset" | "" => Self::Unset,
            "ProcessAccepted" => Self::ProcessAccepted,
            "ProcessStarted" => Self::ProcessStarted,
            "ProcessPaused" => Self::ProcessPaused,
            "ProcessSucceeded" => Self::ProcessSucceeded,
            "ProcessFailed" => Self::ProcessFailed,
            "Exception" => Self::Exception,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl From<String> for ExecutionStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
