//! Response Parser
//!
//! Updates an [`Execution`] from an ExecuteResponse or ExceptionReport
//! document.
//!
//! # Example ExecuteResponse
//!
//! ```xml
//! <wps:ExecuteResponse serviceInstance="http://host/wps?service=WPS&amp;request=GetCapabilities"
//!     statusLocation="http://host/RetrieveResultServlet?id=6f9c">
//!   <wps:Process wps:processVersion="1.0.0">
//!     <ows:Identifier>FeatureWeightedGridStatisticsAlgorithm</ows:Identifier>
//!   </wps:Process>
//!   <wps:Status creationTime="2011-10-13T14:16:22.622-05:00">
//!     <wps:ProcessSucceeded>Process successful</wps:ProcessSucceeded>
//!   </wps:Status>
//!   <wps:ProcessOutputs>...</wps:ProcessOutputs>
//! </wps:ExecuteResponse>
//! ```

use log::{debug, info, warn};
use roxmltree::Node;

use crate::error::{Result, WpsError};
use crate::model::{ExecutionStatus, Input, Output, Process, WpsException};
use crate::xml::{parse_document, ElementExt};

use super::job::Execution;

/// Parses a response document into `into`.
///
/// The root element decides the handling: `ExecuteResponse`,
/// `ExceptionReport`, or anything else (logged and ignored).
///
/// # Errors
///
/// Returns a structural error if the document is not XML or an
/// ExecuteResponse has no status.
pub fn parse_response(xml: &str, into: &mut Execution) -> Result<()> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    match root.local_name() {
        "ExecuteResponse" => parse_execute_response(root, into),
        "ExceptionReport" => {
            parse_exception_report(root, into);
            Ok(())
        }
        other => {
            warn!("Unknown response document root '{}', ignoring", other);
            Ok(())
        }
    }
}

fn parse_exception_report(report: Node, into: &mut Execution) {
    if into.status == ExecutionStatus::Unset {
        into.status = ExecutionStatus::Exception;
        into.record_status();
    }

    let exceptions = WpsException::from_report(report);
    for exception in &exceptions {
        warn!("Server exception: {}", exception);
    }
    into.errors.extend(exceptions);
}

fn parse_execute_response(root: Node, into: &mut Execution) -> Result<()> {
    let status_element = root
        .child_element("Status")
        .ok_or_else(|| WpsError::missing("Status", "ExecuteResponse"))?;
    let state = status_element
        .first_element_child()
        .ok_or_else(|| WpsError::missing("status value", "Status"))?;

    let process = root
        .child_element("Process")
        .map(Process::from_element)
        .transpose()?;

    let data_inputs = root
        .find_all_path(&["DataInputs", "Input"])
        .into_iter()
        .map(Input::from_element)
        .collect::<Result<Vec<_>>>()?;

    let process_outputs = root
        .find_all_path(&["ProcessOutputs", "Output"])
        .into_iter()
        .map(Output::from_element)
        .collect::<Result<Vec<_>>>()?;

    // Nothing is written to `into` until the whole document has parsed.
    if let Some(instance) = root.attr("serviceInstance") {
        into.service_instance = Some(instance);
    }
    if let Some(location) = root.attr("statusLocation") {
        debug!("Status location: {}", location);
        into.status_location = Some(location);
    }

    into.status = ExecutionStatus::from_element_name(state.local_name());
    into.creation_time = status_element.attr("creationTime");
    into.percent_completed = state.attr("percentCompleted").and_then(|p| p.parse().ok());
    into.status_message = if state.first_element_child().is_none() {
        state.text_content()
    } else {
        None
    };

    if into.record_status() {
        info!(
            "Execution status: {}{}",
            into.status,
            into.percent_completed
                .map(|p| format!(" ({}%)", p))
                .unwrap_or_default()
        );
    }

    if let Some(process) = process {
        into.process = Some(process);
    }

    if let Some(report) = status_element
        .descendants()
        .find(|n| n.is_named("ExceptionReport"))
    {
        parse_exception_report(report, into);
    }

    into.data_inputs = data_inputs;
    into.process_outputs = process_outputs;

    debug!(
        "Parsed ExecuteResponse: {} inputs, {} outputs",
        into.data_inputs.len(),
        into.process_outputs.len()
    );

    Ok(())
}
