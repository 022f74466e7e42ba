//! Protocol Exceptions
//!
//! One [`WpsException`] per `<ows:Exception>` element of an ExceptionReport.
//! These are data recorded on an execution, not Rust errors.

use std::fmt;

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::xml::ElementExt;

/// A server-reported exception.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WpsException {
    /// `exceptionCode` attribute
    pub code: Option<String>,
    /// `locator` attribute
    pub locator: Option<String>,
    /// `ExceptionText` content, empty when absent
    pub text: String,
}

impl WpsException {
    /// Reads an `<Exception>` element.
    ///
    /// ```xml
    /// <ows:Exception exceptionCode="MissingParameterValue" locator="FEATURE_ATTRIBUTE_NAME">
    ///   <ows:ExceptionText>Missing required input</ows:ExceptionText>
    /// </ows:Exception>
    /// ```
    pub fn from_element(element: Node) -> Self {
        Self {
            code: element.attr("exceptionCode"),
            locator: element.attr("locator"),
            text: element.child_text("ExceptionText").unwrap_or_default(),
        }
    }

    /// Parses every `Exception` child of an `ExceptionReport`, in document order.
    pub fn from_report(report: Node) -> Vec<Self> {
        report
            .child_elements("Exception")
            .into_iter()
            .map(Self::from_element)
            .collect()
    }
}

impl fmt::Display for WpsException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code.as_deref().unwrap_or("Exception"))?;
        if let Some(locator) = &self.locator {
            write!(f, " [{}]", locator)?;
        }
        if !self.text.is_empty() {
            write!(f, ": {}", self.text)?;
        }
        Ok(())
    }
}
