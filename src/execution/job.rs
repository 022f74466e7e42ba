//! Execution Controller
//!
//! Tracks one process execution from request building through submission,
//! status polling and output retrieval.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::error::{Result, WpsError};
use crate::model::{ExecutionStatus, Input, Output, OutputData, Process, WpsException};
use crate::request::{build_execute_request, InputValue};
use crate::transport::{Credentials, Transport};
use crate::xml::{XmlElement, WPS_DEFAULT_VERSION};

use super::output::{derive_file_name, OutputResult};
use super::response::parse_response;
use super::state::ExecutionState;
use super::timeline::StatusTimeline;

/// Default interval between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// A single process execution.
///
/// The status only changes when a server document is parsed. Callers drive
/// polling themselves through [`check_status`](Self::check_status).
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use wpsclient::execution::Execution;
/// use wpsclient::request::InputValue;
/// use wpsclient::transport::ReqwestTransport;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let transport = Arc::new(ReqwestTransport::new()?);
///     let mut execution = Execution::new("http://host/wps/WebProcessingService", transport);
///
///     let inputs = vec![("message", InputValue::from("hello"))];
///     let request = execution.build_request("EchoProcess", &inputs, Some("OUTPUT"))?;
///     let response = execution.submit_request(&request.to_xml_string()?)?;
///     execution.parse_response(&response)?;
///
///     while !execution.is_complete()? {
///         execution.check_status(None, None, Duration::from_secs(10))?;
///     }
///     execution.get_output(None)?;
///     Ok(())
/// }
/// ```
pub struct Execution {
    url: String,
    version: String,
    credentials: Option<Credentials>,
    transport: Arc<dyn Transport>,
    created_at: DateTime<Utc>,
    timeline: StatusTimeline,

    /// Process being executed (refreshed from each ExecuteResponse)
    pub process: Option<Process>,
    pub service_instance: Option<String>,
    /// URL polled for status updates
    pub status_location: Option<String>,
    pub status: ExecutionStatus,
    /// Text of the status element
    pub status_message: Option<String>,
    pub percent_completed: Option<u32>,
    /// `creationTime` of the last status
    pub creation_time: Option<String>,
    /// Server exceptions, in the order received
    pub errors: Vec<WpsException>,
    /// Inputs echoed by the last ExecuteResponse
    pub data_inputs: Vec<Input>,
    /// Outputs from the last ExecuteResponse
    pub process_outputs: Vec<Output>,
    /// Last request document sent
    pub request: Option<String>,
    /// Last response document received
    pub response: Option<String>,
}

impl Execution {
    /// Creates an execution against a service URL.
    pub fn new(url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            url: url.into(),
            version: WPS_DEFAULT_VERSION.to_string(),
            credentials: None,
            transport,
            created_at: Utc::now(),
            timeline: StatusTimeline::new(),
            process: None,
            service_instance: None,
            status_location: None,
            status: ExecutionStatus::Unset,
            status_message: None,
            percent_completed: None,
            creation_time: None,
            errors: Vec::new(),
            data_inputs: Vec::new(),
            process_outputs: Vec::new(),
            request: None,
            response: None,
        }
    }

    /// Sets the protocol version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets basic-auth credentials used for every request of this execution.
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn timeline(&self) -> &StatusTimeline {
        &self.timeline
    }

    /// Builds an Execute request and remembers its serialized form.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Process identifier
    /// * `inputs` - Ordered `(input identifier, value)` pairs
    /// * `output` - Output to request by reference (asynchronous execution)
    pub fn build_request<S: AsRef<str>>(
        &mut self,
        identifier: &str,
        inputs: &[(S, InputValue)],
        output: Option<&str>,
    ) -> Result<XmlElement> {
        let request = build_execute_request(identifier, inputs, output);
        let xml = request.to_xml_string()?;
        debug!("Execute request:\n{}", xml);

        if self.process.is_none() {
            self.process = Some(Process::new(identifier));
        }
        self.request = Some(xml);
        Ok(request)
    }

    /// POSTs a request document to the service and returns the response body.
    pub fn submit_request(&mut self, request: &str) -> Result<String> {
        info!("Submitting Execute request to {}", self.url);
        self.request = Some(request.to_string());

        let bytes = self
            .transport
            .post(&self.url, request, self.credentials.as_ref())?;
        let response = String::from_utf8(bytes)?;
        debug!("Execute response:\n{}", response);

        self.response = Some(response.clone());
        Ok(response)
    }

    /// Updates this execution from an ExecuteResponse or ExceptionReport.
    pub fn parse_response(&mut self, xml: &str) -> Result<()> {
        parse_response(xml, self)
    }

    /// Refreshes the status once.
    ///
    /// # Arguments
    ///
    /// * `url` - Replaces the stored status location before polling
    /// * `response` - A status document to parse instead of polling
    /// * `wait` - Sleep applied after parsing if the job is still running
    ///
    /// # Errors
    ///
    /// [`WpsError::MissingStatusLocation`] if a poll is needed but no
    /// status location is known; transport and parse errors otherwise.
    pub fn check_status(
        &mut self,
        url: Option<&str>,
        response: Option<&str>,
        wait: Duration,
    ) -> Result<()> {
        match response {
            Some(xml) => {
                self.response = Some(xml.to_string());
                self.parse_response(xml)?;
            }
            None => {
                if let Some(url) = url {
                    self.status_location = Some(url.to_string());
                }
                let location = self
                    .status_location
                    .clone()
                    .ok_or(WpsError::MissingStatusLocation)?;

                info!("Checking execution status at {}", location);
                let bytes = self
                    .transport
                    .get(&location, &[], self.credentials.as_ref())?;
                let xml = String::from_utf8(bytes)?;
                self.parse_response(&xml)?;
                self.response = Some(xml);
            }
        }

        if !self.is_complete()? && !wait.is_zero() {
            debug!("Execution not complete, sleeping {:?}", wait);
            thread::sleep(wait);
        }

        Ok(())
    }

    /// Polls until the job reaches a terminal status.
    ///
    /// # Returns
    ///
    /// `true` if the job completed, `false` if `max_polls` ran out first.
    pub fn wait_until_complete(&mut self, wait: Duration, max_polls: Option<u32>) -> Result<bool> {
        let mut polls = 0;
        while !self.is_complete()? {
            if max_polls.map_or(false, |max| polls >= max) {
                warn!("Gave up after {} status polls (status: {})", polls, self.status);
                return Ok(false);
            }
            self.check_status(None, None, wait)?;
            polls += 1;
        }
        Ok(true)
    }

    /// Returns true if the job reached a terminal status.
    pub fn is_complete(&self) -> Result<bool> {
        self.status.is_complete()
    }

    pub fn is_succeeded(&self) -> bool {
        self.status.is_succeeded()
    }

    /// Retrieves the job's outputs.
    ///
    /// Reference outputs are downloaded to `target` or, when `None`, to a
    /// name derived from the reference URL in the current directory. With an
    /// explicit `target` every reference output is written to the same path,
    /// so the last one wins. Inline outputs are returned without touching
    /// the disk.
    ///
    /// # Errors
    ///
    /// [`WpsError::NotSucceeded`] before the job has succeeded, without any
    /// network access.
    pub fn get_output(&self, target: Option<&Path>) -> Result<Vec<OutputResult>> {
        self.collect_outputs(|href| match target {
            Some(path) => Ok(path.to_path_buf()),
            None => derive_file_name(href).map(PathBuf::from),
        })
    }

    /// Retrieves the job's outputs into a directory, using derived file names.
    pub fn get_output_in(&self, dir: &Path) -> Result<Vec<OutputResult>> {
        if !self.is_succeeded() {
            return Err(self.not_succeeded());
        }
        fs::create_dir_all(dir)?;
        self.collect_outputs(|href| Ok(dir.join(derive_file_name(href)?)))
    }

    fn not_succeeded(&self) -> WpsError {
        WpsError::NotSucceeded {
            status: self.status.to_string(),
        }
    }

    fn collect_outputs<F>(&self, destination: F) -> Result<Vec<OutputResult>>
    where
        F: Fn(&str) -> Result<PathBuf>,
    {
        if !self.is_succeeded() {
            return Err(self.not_succeeded());
        }

        let mut results = Vec::new();
        for output in &self.process_outputs {
            match &output.data {
                OutputData::Reference { href, .. } => {
                    let path = destination(href)?;
                    let bytes = self.transport.get(href, &[], self.credentials.as_ref())?;
                    fs::write(&path, &bytes)?;
                    info!(
                        "Output '{}' written to {} ({} bytes)",
                        output.identifier(),
                        path.display(),
                        bytes.len()
                    );
                    results.push(OutputResult::File {
                        identifier: output.identifier().to_string(),
                        path,
                        bytes: bytes.len(),
                    });
                }
                OutputData::Inline { data, format } => {
                    results.push(OutputResult::Inline {
                        identifier: output.identifier().to_string(),
                        data: data.clone(),
                        mime_type: format.mime_type.clone(),
                    });
                }
                OutputData::None => {
                    warn!("Output '{}' has no result", output.identifier());
                }
            }
        }

        Ok(results)
    }

    /// Captures what is needed to resume polling later.
    pub fn snapshot(&self) -> ExecutionState {
        let process = self
            .process
            .as_ref()
            .map(|p| p.identifier.as_str())
            .unwrap_or_default();

        let mut state = ExecutionState::new(&self.url, &self.version, process);
        state.created_at = self.created_at;
        state.update(self.status.clone(), self.status_location.clone());
        state
    }

    /// Recreates an execution from a saved snapshot.
    ///
    /// Only the poll target and last status are restored; call
    /// [`check_status`](Self::check_status) to refresh everything else.
    pub fn resume(state: &ExecutionState, transport: Arc<dyn Transport>) -> Self {
        let mut execution = Self::new(state.url.clone(), transport).with_version(state.version.clone());
        execution.created_at = state.created_at;
        execution.process = Some(Process::new(state.process.clone()));
        execution.status_location = state.status_location.clone();
        execution.status = state.status.clone();
        execution.record_status();
        execution
    }

    /// Adds the current status to the timeline. Returns true if it changed.
    pub(crate) fn record_status(&mut self) -> bool {
        self.timeline.record(
            &self.status,
            self.status_message.as_deref(),
            self.percent_completed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::fixtures;
    use crate::transport::tests::{Call, MockTransport};
    use crate::xml::{parse_document, ElementExt};
    use std::time::Instant;
    use tempfile::tempdir;

    const URL: &str = "http://host/wps/WebProcessingService";

    fn execution_with(mock: MockTransport) -> (Execution, Arc<MockTransport>) {
        let mock = Arc::new(mock);
        let execution = Execution::new(URL, mock.clone());
        (execution, mock)
    }

    #[test]
    fn test_build_request_records_xml() {
        let (mut exec, mock) = execution_with(MockTransport::new());
        let inputs = vec![("message", InputValue::from("hello"))];
        let request = exec.build_request("EchoProcess", &inputs, None).unwrap();

        assert_eq!(request.name(), "wps:Execute");
        assert!(exec.request.as_deref().unwrap().contains("<wps:LiteralData>hello</wps:LiteralData>"));
        assert_eq!(exec.process.as_ref().unwrap().identifier, "EchoProcess");
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_submit_posts_with_credentials() {
        let (exec, mock) = execution_with(MockTransport::new().respond(fixtures::ACCEPTED));
        let mut exec = exec.with_credentials(Some(Credentials::new("user", "pw")));

        let response = exec.submit_request("<wps:Execute/>").unwrap();
        exec.parse_response(&response).unwrap();

        assert_eq!(exec.status, ExecutionStatus::ProcessAccepted);
        assert_eq!(
            exec.status_location.as_deref(),
            Some("http://host/wps/RetrieveResultServlet?id=6f9c")
        );

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Post { url, body, credentials } => {
                assert_eq!(url, URL);
                assert_eq!(body, "<wps:Execute/>");
                assert_eq!(credentials.as_ref().unwrap().username, "user");
            }
            other => panic!("expected POST, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_rejects_non_utf8() {
        let (mut exec, _) = execution_with(MockTransport::new().respond(vec![0xff, 0xfe, 0x00]));
        let err = exec.submit_request("<x/>").unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_submit_transport_failure() {
        let (mut exec, _) = execution_with(MockTransport::new().fail("connection refused"));
        let err = exec.submit_request("<x/>").unwrap_err();
        assert!(err.is_transport());
        assert_eq!(exec.status, ExecutionStatus::Unset);
    }

    #[test]
    fn test_check_status_inline_response_makes_no_call() {
        let (mut exec, mock) = execution_with(MockTransport::new());
        exec.check_status(None, Some(fixtures::SUCCEEDED), Duration::from_secs(3600))
            .unwrap();

        assert!(exec.is_succeeded());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_check_status_sleeps_while_running() {
        let (mut exec, _) = execution_with(MockTransport::new());
        let wait = Duration::from_millis(50);

        let start = Instant::now();
        exec.check_status(None, Some(fixtures::STARTED), wait).unwrap();
        assert!(start.elapsed() >= wait);
        assert_eq!(exec.status, ExecutionStatus::ProcessStarted);
    }

    #[test]
    fn test_check_status_without_location() {
        let (mut exec, mock) = execution_with(MockTransport::new());
        let err = exec.check_status(None, None, Duration::ZERO).unwrap_err();

        assert!(matches!(err, WpsError::MissingStatusLocation));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_check_status_polls_location_override() {
        let (mut exec, mock) = execution_with(MockTransport::new().respond(fixtures::STARTED));
        exec.check_status(Some("http://host/status/9.xml"), None, Duration::ZERO)
            .unwrap();

        assert_eq!(exec.status, ExecutionStatus::ProcessStarted);
        assert_eq!(exec.status_location.as_deref(), Some("http://host/status/9.xml"));
        assert_eq!(mock.calls()[0].url(), "http://host/status/9.xml");
    }

    #[test]
    fn test_check_status_unknown_status_is_error() {
        let xml = r#"<wps:ExecuteResponse xmlns:wps="http://www.opengis.net/wps/1.0.0">
            <wps:Status><wps:ProcessQueued/></wps:Status>
        </wps:ExecuteResponse>"#;
        let (mut exec, _) = execution_with(MockTransport::new());
        let err = exec.check_status(None, Some(xml), Duration::ZERO).unwrap_err();
        assert!(matches!(err, WpsError::UnknownStatus(_)));
    }

    #[test]
    fn test_wait_until_complete() {
        let mock = MockTransport::new()
            .respond(fixtures::STARTED)
            .respond(fixtures::SUCCEEDED);
        let (mut exec, mock) = execution_with(mock);
        exec.parse_response(fixtures::ACCEPTED).unwrap();

        assert!(exec.wait_until_complete(Duration::ZERO, Some(5)).unwrap());
        assert!(exec.is_succeeded());
        assert_eq!(mock.calls().len(), 2);

        let statuses: Vec<_> = exec
            .timeline()
            .events()
            .iter()
            .map(|e| e.status.clone())
            .collect();
        assert_eq!(
            statuses,
            vec![
                ExecutionStatus::ProcessAccepted,
                ExecutionStatus::ProcessStarted,
                ExecutionStatus::ProcessSucceeded
            ]
        );
    }

    #[test]
    fn test_wait_until_complete_gives_up() {
        let mock = MockTransport::new()
            .respond(fixtures::STARTED)
            .respond(fixtures::STARTED);
        let (mut exec, mock) = execution_with(mock);
        exec.parse_response(fixtures::ACCEPTED).unwrap();

        assert!(!exec.wait_until_complete(Duration::ZERO, Some(2)).unwrap());
        assert_eq!(mock.calls().len(), 2);
    }

    #[test]
    fn test_get_output_before_success_makes_no_call() {
        let (mut exec, mock) = execution_with(MockTransport::new());
        exec.parse_response(fixtures::STARTED).unwrap();

        let err = exec.get_output(None).unwrap_err();
        assert!(matches!(err, WpsError::NotSucceeded { ref status } if status == "ProcessStarted"));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_get_output_in_directory() {
        let temp_dir = tempdir().unwrap();
        let (mut exec, mock) = execution_with(MockTransport::new().respond("a,b\n1,2\n"));
        exec.parse_response(fixtures::SUCCEEDED).unwrap();

        let results = exec.get_output_in(temp_dir.path()).unwrap();
        assert_eq!(results.len(), 2);

        let expected = temp_dir.path().join("1318528582026OUTPUT");
        assert_eq!(
            results[0],
            OutputResult::File {
                identifier: "OUTPUT".to_string(),
                path: expected.clone(),
                bytes: 8,
            }
        );
        assert_eq!(fs::read_to_string(&expected).unwrap(), "a,b\n1,2\n");
        assert_eq!(
            results[1],
            OutputResult::Inline {
                identifier: "POLYGON".to_string(),
                data: "7504912.93758151 -764109.175074507".to_string(),
                mime_type: Some("text/plain".to_string()),
            }
        );

        assert_eq!(
            mock.calls()[0].url(),
            "http://host/wps/RetrieveResultServlet?id=1318528582026OUTPUT"
        );
    }

    #[test]
    fn test_get_output_explicit_target() {
        let temp_dir = tempdir().unwrap();
        let target = temp_dir.path().join("result.csv");
        let (mut exec, _) = execution_with(MockTransport::new().respond("x"));
        exec.parse_response(fixtures::SUCCEEDED).unwrap();

        let results = exec.get_output(Some(&target)).unwrap();
        assert!(matches!(&results[0], OutputResult::File { path, .. } if *path == target));
        assert_eq!(fs::read_to_string(&target).unwrap(), "x");
    }

    #[test]
    fn test_get_output_propagates_transport_error() {
        let temp_dir = tempdir().unwrap();
        let (mut exec, _) = execution_with(MockTransport::new().fail("HTTP 404"));
        exec.parse_response(fixtures::SUCCEEDED).unwrap();

        let err = exec.get_output_in(temp_dir.path()).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_snapshot_and_resume() {
        let (mut exec, _) = execution_with(MockTransport::new());
        exec.parse_response(fixtures::ACCEPTED).unwrap();

        let state = exec.snapshot();
        assert_eq!(state.process, "FeatureWeightedGridStatisticsAlgorithm");
        assert_eq!(state.status, ExecutionStatus::ProcessAccepted);
        assert!(state.is_resumable());

        let mock = Arc::new(MockTransport::new().respond(fixtures::SUCCEEDED));
        let mut resumed = Execution::resume(&state, mock.clone());
        assert_eq!(resumed.status, ExecutionStatus::ProcessAccepted);
        assert_eq!(resumed.status_location, exec.status_location);

        resumed.check_status(None, None, Duration::ZERO).unwrap();
        assert!(resumed.is_succeeded());
        assert_eq!(
            mock.calls()[0].url(),
            "http://host/wps/RetrieveResultServlet?id=6f9c"
        );
    }

    #[test]
    fn test_echo_process_end_to_end() {
        let response = r#"<wps:ExecuteResponse xmlns:wps="http://www.opengis.net/wps/1.0.0"
                xmlns:ows="http://www.opengis.net/ows/1.1">
            <wps:Status><wps:ProcessSucceeded/></wps:Status>
            <wps:ProcessOutputs>
                <wps:Output>
                    <ows:Identifier>message</ows:Identifier>
                    <wps:Data><wps:LiteralData>hello</wps:LiteralData></wps:Data>
                </wps:Output>
            </wps:ProcessOutputs>
        </wps:ExecuteResponse>"#;
        let (mut exec, mock) = execution_with(MockTransport::new().respond(response));

        let inputs = vec![("message", InputValue::from("hello"))];
        let request = exec.build_request("EchoProcess", &inputs, None).unwrap();
        let body = exec.submit_request(&request.to_xml_string().unwrap()).unwrap();
        exec.parse_response(&body).unwrap();

        let calls = mock.calls();
        let Call::Post { body, .. } = &calls[0] else {
            panic!("expected POST");
        };
        let doc = parse_document(body).unwrap();
        assert!(doc.root_element().child_element("ResponseForm").is_none());

        let results = exec.get_output(None).unwrap();
        assert_eq!(
            results,
            vec![OutputResult::Inline {
                identifier: "message".to_string(),
                data: "hello".to_string(),
                mime_type: None,
            }]
        );
    }
}
