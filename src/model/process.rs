//! Process Descriptions
//!
//! A [`Process`] is read from a capabilities `ProcessOfferings/Process`
//! entry (identifier and titles only), a DescribeProcess
//! `ProcessDescription` (full input/output declarations), or the `Process`
//! element embedded in an ExecuteResponse.

use log::debug;
use roxmltree::Node;
use serde::Serialize;

use crate::error::{Result, WpsError};
use crate::xml::ElementExt;

use super::io::{Input, Output};

/// A process offered by a WPS endpoint.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Process {
    pub identifier: String,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// `wps:processVersion` attribute
    pub version: Option<String>,
    pub status_supported: bool,
    pub store_supported: bool,
    /// Declared inputs, in document order
    pub inputs: Vec<Input>,
    /// Declared outputs, in document order
    pub outputs: Vec<Output>,
}

impl Process {
    /// Creates a process known only by its identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    /// Parses a `Process` or `ProcessDescription` element.
    ///
    /// # Errors
    ///
    /// Returns [`WpsError::MissingElement`] if the process, or any declared
    /// input or output, has no identifier.
    pub fn from_element(element: Node) -> Result<Self> {
        let identifier = element
            .child_text("Identifier")
            .ok_or_else(|| WpsError::missing("Identifier", element.local_name()))?;

        let inputs = element
            .find_all_path(&["DataInputs", "Input"])
            .into_iter()
            .map(Input::from_element)
            .collect::<Result<Vec<_>>>()?;

        let outputs = element
            .find_all_path(&["ProcessOutputs", "Output"])
            .into_iter()
            .map(Output::from_element)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Parsed process '{}' ({} inputs, {} outputs)",
            identifier,
            inputs.len(),
            outputs.len()
        );

        Ok(Self {
            identifier,
            title: element.child_text("Title"),
            abstract_text: element.child_text("Abstract"),
            version: element.attr("processVersion"),
            status_supported: element.attr("statusSupported").as_deref() == Some("true"),
            store_supported: element.attr("storeSupported").as_deref() == Some("true"),
            inputs,
            outputs,
        })
    }

    /// Finds a declared input by identifier.
    pub fn input(&self, identifier: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.identifier() == identifier)
    }

    /// Finds a declared output by identifier.
    pub fn output(&self, identifier: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.identifier() == identifier)
    }
}
