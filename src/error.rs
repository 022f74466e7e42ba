//! Client Error Types
//!
//! A single error enum covers every failure the client reports. Protocol
//! failures (an `ExceptionReport`, a `ProcessFailed` status) are not errors:
//! they are recorded on the [`Execution`](crate::execution::Execution) as data.

use thiserror::Error;

/// Errors raised by the WPS client.
#[derive(Debug, Error)]
pub enum WpsError {
    /// Network or HTTP failure. Never retried by the client.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The response body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The response body is not valid UTF-8.
    #[error("Response is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// A required element or attribute is absent.
    #[error("Missing required element '{element}' in {context}")]
    MissingElement {
        element: String,
        context: String,
    },

    /// A GetCapabilities or DescribeProcess request was answered with an ExceptionReport.
    #[error("Service exception: {0}")]
    ServiceException(String),

    /// The server reported a status the client does not recognise.
    #[error("Unknown process execution status: {0}")]
    UnknownStatus(String),

    /// Output retrieval was requested before the job succeeded.
    #[error("Execution not successfully completed: status={status}")]
    NotSucceeded { status: String },

    /// A poll was requested but no status location is known.
    #[error("No status location available to poll")]
    MissingStatusLocation,

    /// A raw XML input fragment is not well-formed.
    #[error("Invalid XML fragment: {0}")]
    InvalidFragment(String),

    /// No file name could be derived for a referenced output.
    #[error("Cannot derive an output file name from '{0}'")]
    OutputName(String),

    /// A job definition failed validation.
    #[error("Invalid job definition: {0}")]
    InvalidJob(String),

    /// Request serialization failed.
    #[error("Failed to render XML: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl WpsError {
    /// Creates a missing-element error.
    pub fn missing(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Check if this is a network/HTTP failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::InvalidUrl(_))
    }

    /// Check if this is a malformed-document failure.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Xml(_) | Self::Encoding(_) | Self::MissingElement { .. }
        )
    }

    /// Check if this error was caused by calling the API out of order or with bad input.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::NotSucceeded { .. }
                | Self::MissingStatusLocation
                | Self::InvalidFragment(_)
                | Self::OutputName(_)
                | Self::InvalidJob(_)
        )
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, WpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(WpsError::Transport("refused".to_string()).is_transport());
        assert!(WpsError::missing("Status", "ExecuteResponse").is_structural());
        assert!(WpsError::MissingStatusLocation.is_misuse());
        assert!(!WpsError::UnknownStatus("Weird".to_string()).is_misuse());
        assert!(!WpsError::ServiceException("NoApplicableCode".to_string()).is_structural());
    }

    #[test]
    fn test_error_messages() {
        let err = WpsError::NotSucceeded {
            status: "ProcessStarted".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Execution not successfully completed: status=ProcessStarted"
        );

        let err = WpsError::missing("Status", "ExecuteResponse");
        assert!(err.to_string().contains("'Status'"));
    }

    #[test]
    fn test_xml_error_conversion() {
        let err: WpsError = roxmltree::Document::parse("<open>").unwrap_err().into();
        assert!(err.is_structural());
    }
}
