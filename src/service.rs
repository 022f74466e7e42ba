//! Web Processing Service Facade
//!
//! One endpoint: capabilities discovery, process descriptions and process
//! execution, sharing a transport and credentials.

use std::sync::Arc;

use log::{debug, info};
use roxmltree::Node;

use crate::error::{Result, WpsError};
use crate::execution::Execution;
use crate::model::{Process, WpsException};
use crate::request::InputValue;
use crate::transport::{Credentials, ReqwestTransport, Transport};
use crate::xml::{parse_document, ElementExt, WPS_DEFAULT_VERSION};

/// Client for a single WPS endpoint.
///
/// # Example
///
/// ```rust,no_run
/// use wpsclient::service::WebProcessingService;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut wps = WebProcessingService::connect("http://host/wps/WebProcessingService")?;
///     for process in wps.get_capabilities(None)? {
///         println!("{}", process.identifier);
///     }
///     let process = wps.describe_process("EchoProcess", None)?;
///     println!("{} inputs", process.inputs.len());
///     Ok(())
/// }
/// ```
pub struct WebProcessingService {
    url: String,
    version: String,
    credentials: Option<Credentials>,
    transport: Arc<dyn Transport>,
    /// Processes known from capabilities and descriptions
    pub processes: Vec<Process>,
}

impl WebProcessingService {
    /// Creates a service client over a given transport.
    pub fn new(url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            url: url.into(),
            version: WPS_DEFAULT_VERSION.to_string(),
            credentials: None,
            transport,
            processes: Vec::new(),
        }
    }

    /// Creates a service client with a default HTTP transport.
    pub fn connect(url: impl Into<String>) -> Result<Self> {
        Ok(Self::new(url, Arc::new(ReqwestTransport::new()?)))
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

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

    /// Returns the transport shared with executions started by this service.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Issues a key-value-pair GET request and returns the body as text.
    fn fetch(&self, request: &str, identifier: Option<&str>) -> Result<String> {
        let mut params = vec![
            ("service", "WPS"),
            ("version", self.version.as_str()),
            ("request", request),
        ];
        if let Some(identifier) = identifier {
            params.push(("identifier", identifier));
        }

        info!("{} request to {}", request, self.url);
        let bytes = self
            .transport
            .get(&self.url, &params, self.credentials.as_ref())?;
        let xml = String::from_utf8(bytes)?;
        debug!("{} response:\n{}", request, xml);
        Ok(xml)
    }

    /// Reads the process offerings of the service.
    ///
    /// # Arguments
    ///
    /// * `xml` - A capabilities document to parse instead of fetching one
    ///
    /// # Returns
    ///
    /// The offered processes (identifier, title, abstract and version only).
    /// They replace the service's known process list.
    pub fn get_capabilities(&mut self, xml: Option<&str>) -> Result<&[Process]> {
        let xml = match xml {
            Some(xml) => xml.to_string(),
            None => self.fetch("GetCapabilities", None)?,
        };

        let doc = parse_document(&xml)?;
        let root = doc.root_element();
        check_exception_report(root)?;
        if root.local_name() != "Capabilities" {
            return Err(WpsError::missing("Capabilities", root.local_name()));
        }

        self.processes = root
            .find_all_path(&["ProcessOfferings", "Process"])
            .into_iter()
            .map(Process::from_element)
            .collect::<Result<Vec<_>>>()?;

        info!("Service offers {} processes", self.processes.len());
        Ok(&self.processes)
    }

    /// Reads the full description of one process.
    ///
    /// The description replaces any process with the same identifier in the
    /// known process list, or is appended to it.
    pub fn describe_process(&mut self, identifier: &str, xml: Option<&str>) -> Result<Process> {
        let xml = match xml {
            Some(xml) => xml.to_string(),
            None => self.fetch("DescribeProcess", Some(identifier))?,
        };

        let doc = parse_document(&xml)?;
        let root = doc.root_element();
        check_exception_report(root)?;

        let description = match root.is_named("ProcessDescription") {
            true => root,
            false => root
                .child_element("ProcessDescription")
                .ok_or_else(|| WpsError::missing("ProcessDescription", root.local_name()))?,
        };

        let process = Process::from_element(description)?;
        match self
            .processes
            .iter_mut()
            .find(|p| p.identifier == process.identifier)
        {
            Some(existing) => *existing = process.clone(),
            None => self.processes.push(process.clone()),
        }

        Ok(process)
    }

    /// Executes a process and parses the first response.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Process identifier
    /// * `inputs` - Ordered `(input identifier, value)` pairs
    /// * `output` - Output to request by reference (asynchronous execution)
    /// * `request` - A pre-built request document, used instead of `inputs`
    /// * `response` - A response document to parse instead of submitting
    ///
    /// # Returns
    ///
    /// The [`Execution`], ready for [`check_status`](Execution::check_status)
    /// polling when the job runs asynchronously.
    pub fn execute<S: AsRef<str>>(
        &self,
        identifier: &str,
        inputs: &[(S, InputValue)],
        output: Option<&str>,
        request: Option<&str>,
        response: Option<&str>,
    ) -> Result<Execution> {
        let mut execution = Execution::new(self.url.clone(), self.transport())
            .with_version(self.version.clone())
            .with_credentials(self.credentials.clone());

        let request = match request {
            Some(request) => request.to_string(),
            None => execution
                .build_request(identifier, inputs, output)?
                .to_xml_string()?,
        };

        let response = match response {
            Some(response) => response.to_string(),
            None => execution.submit_request(&request)?,
        };

        execution.parse_response(&response)?;
        Ok(execution)
    }
}

fn check_exception_report(root: Node) -> Result<()> {
    if !root.is_named("ExceptionReport") {
        return Ok(());
    }
    let message = WpsException::from_report(root)
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Err(WpsError::ServiceException(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExecutionStatus;
    use crate::transport::tests::{Call, MockTransport};

    const URL: &str = "http://host/wps/WebProcessingService";

    const CAPABILITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wps:Capabilities service="WPS" version="1.0.0"
    xmlns:wps="http://www.opengis.net/wps/1.0.0"
    xmlns:ows="http://www.opengis.net/ows/1.1">
    <ows:ServiceIdentification>
        <ows:Title>Geo Data Portal</ows:Title>
    </ows:ServiceIdentification>
    <wps:ProcessOfferings>
        <wps:Process wps:processVersion="1.0.0">
            <ows:Identifier>EchoProcess</ows:Identifier>
            <ows:Title>Echo</ows:Title>
        </wps:Process>
        <wps:Process wps:processVersion="1.0.0">
            <ows:Identifier>gov.usgs.cida.gdp.wps.algorithm.FeatureCoverageOPeNDAPIntersectionAlgorithm</ows:Identifier>
            <ows:Title>Feature Coverage OPeNDAP Intersection</ows:Title>
        </wps:Process>
    </wps:ProcessOfferings>
</wps:Capabilities>"#;

    const DESCRIPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wps:ProcessDescriptions xmlns:wps="http://www.opengis.net/wps/1.0.0"
    xmlns:ows="http://www.opengis.net/ows/1.1" service="WPS" version="1.0.0">
    <ProcessDescription wps:processVersion="1.0.0" statusSupported="true" storeSupported="true">
        <ows:Identifier>EchoProcess</ows:Identifier>
        <ows:Title>Echo</ows:Title>
        <DataInputs>
            <Input minOccurs="1" maxOccurs="1">
                <ows:Identifier>message</ows:Identifier>
                <LiteralData><ows:DataType ows:reference="xs:string"/><ows:AnyValue/></LiteralData>
            </Input>
        </DataInputs>
        <ProcessOutputs>
            <Output>
                <ows:Identifier>message</ows:Identifier>
                <LiteralOutput><ows:DataType ows:reference="xs:string"/></LiteralOutput>
            </Output>
        </ProcessOutputs>
    </ProcessDescription>
</wps:ProcessDescriptions>"#;

    fn service(mock: MockTransport) -> (WebProcessingService, Arc<MockTransport>) {
        let mock = Arc::new(mock);
        (WebProcessingService::new(URL, mock.clone()), mock)
    }

    #[test]
    fn test_get_capabilities_request_and_parse() {
        let (mut wps, mock) = service(MockTransport::new().respond(CAPABILITIES));
        let processes = wps.get_capabilities(None).unwrap();

        let ids: Vec<_> = processes.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "EchoProcess",
                "gov.usgs.cida.gdp.wps.algorithm.FeatureCoverageOPeNDAPIntersectionAlgorithm"
            ]
        );

        match &mock.calls()[0] {
            Call::Get { url, params, .. } => {
                assert_eq!(url, URL);
                assert_eq!(
                    params,
                    &vec![
                        ("service".to_string(), "WPS".to_string()),
                        ("version".to_string(), "1.0.0".to_string()),
                        ("request".to_string(), "GetCapabilities".to_string()),
                    ]
                );
            }
            other => panic!("expected GET, got {:?}", other),
        }
    }

    #[test]
    fn test_get_capabilities_from_document() {
        let (mut wps, mock) = service(MockTransport::new());
        assert_eq!(wps.get_capabilities(Some(CAPABILITIES)).unwrap().len(), 2);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_get_capabilities_exception_report() {
        let report = r#"<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows/1.1">
            <ows:Exception exceptionCode="VersionNegotiationFailed"/>
        </ows:ExceptionReport>"#;
        let (mut wps, _) = service(MockTransport::new());
        let err = wps.get_capabilities(Some(report)).unwrap_err();
        assert!(matches!(err, WpsError::ServiceException(ref m) if m == "VersionNegotiationFailed"));
    }

    #[test]
    fn test_describe_process_upserts() {
        let (mut wps, mock) = service(MockTransport::new().respond(DESCRIPTION));
        wps.get_capabilities(Some(CAPABILITIES)).unwrap();

        let process = wps.describe_process("EchoProcess", None).unwrap();
        assert!(process.status_supported);
        assert_eq!(process.inputs.len(), 1);

        assert_eq!(wps.processes.len(), 2);
        assert_eq!(wps.processes[0].inputs.len(), 1);

        match &mock.calls()[0] {
            Call::Get { params, .. } => {
                assert!(params.contains(&("request".to_string(), "DescribeProcess".to_string())));
                assert!(params.contains(&("identifier".to_string(), "EchoProcess".to_string())));
            }
            other => panic!("expected GET, got {:?}", other),
        }
    }

    #[test]
    fn test_describe_unknown_process_appends() {
        let (mut wps, _) = service(MockTransport::new());
        wps.describe_process("EchoProcess", Some(DESCRIPTION)).unwrap();
        assert_eq!(wps.processes.len(), 1);
    }

    #[test]
    fn test_execute_submits_and_parses() {
        let response = r#"<wps:ExecuteResponse xmlns:wps="http://www.opengis.net/wps/1.0.0"
            statusLocation="http://host/status/1.xml">
            <wps:Status><wps:ProcessAccepted/></wps:Status>
        </wps:ExecuteResponse>"#;
        let (wps, mock) = service(MockTransport::new().respond(response));
        let wps = wps.with_credentials(Some(Credentials::new("u", "p")));

        let inputs = vec![("message", InputValue::from("hello"))];
        let execution = wps
            .execute("EchoProcess", &inputs, Some("message"), None, None)
            .unwrap();

        assert_eq!(execution.status, ExecutionStatus::ProcessAccepted);
        assert_eq!(execution.status_location.as_deref(), Some("http://host/status/1.xml"));

        match &mock.calls()[0] {
            Call::Post { body, credentials, .. } => {
                assert!(body.contains("<ows:Identifier>EchoProcess</ows:Identifier>"));
                assert!(body.contains("wps:ResponseForm"));
                assert!(credentials.is_some());
            }
            other => panic!("expected POST, got {:?}", other),
        }
    }

    #[test]
    fn test_execute_with_canned_request_and_response() {
        let response = r#"<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows/1.1">
            <ows:Exception exceptionCode="NoApplicableCode"/>
        </ows:ExceptionReport>"#;
        let (wps, mock) = service(MockTransport::new());

        let inputs: Vec<(&str, InputValue)> = Vec::new();
        let execution = wps
            .execute("EchoProcess", &inputs, None, Some("<wps:Execute/>"), Some(response))
            .unwrap();

        assert_eq!(execution.status, ExecutionStatus::Exception);
        assert_eq!(execution.errors.len(), 1);
        assert!(mock.calls().is_empty());
    }
}
