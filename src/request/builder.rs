//! Execute Request Builder
//!
//! Turns a process identifier and an ordered list of input values into a
//! WPS 1.0.0 `Execute` document.
//!
//! # Example Output
//!
//! ```xml
//! <wps:Execute service="WPS" version="1.0.0" ...>
//!   <ows:Identifier>EchoProcess</ows:Identifier>
//!   <wps:DataInputs>
//!     <wps:Input>
//!       <ows:Identifier>message</ows:Identifier>
//!       <wps:Data><wps:LiteralData>hello</wps:LiteralData></wps:Data>
//!     </wps:Input>
//!   </wps:DataInputs>
//! </wps:Execute>
//! ```

use log::debug;

use crate::xml::{
    XmlElement, OWS_NAMESPACE, WPS_DEFAULT_VERSION, WPS_NAMESPACE, WPS_SCHEMA_LOCATION,
    XLINK_NAMESPACE, XSI_NAMESPACE,
};

use super::inputs::InputValue;

/// Builds an Execute request document.
///
/// # Arguments
///
/// * `identifier` - Process identifier
/// * `inputs` - `(input identifier, value)` pairs, emitted in order
/// * `output` - Output to request by reference; when given, the server is
///   asked to store the response and report status asynchronously
///
/// # Returns
///
/// The root `wps:Execute` element. Nothing is submitted.
pub fn build_execute_request<S: AsRef<str>>(
    identifier: &str,
    inputs: &[(S, InputValue)],
    output: Option<&str>,
) -> XmlElement {
    let mut root = XmlElement::new("wps:Execute")
        .with_attribute("service", "WPS")
        .with_attribute("version", WPS_DEFAULT_VERSION)
        .with_attribute("xmlns:wps", WPS_NAMESPACE)
        .with_attribute("xmlns:ows", OWS_NAMESPACE)
        .with_attribute("xmlns:xlink", XLINK_NAMESPACE)
        .with_attribute("xmlns:xsi", XSI_NAMESPACE)
        .with_attribute(
            "xsi:schemaLocation",
            format!("{} {}", WPS_NAMESPACE, WPS_SCHEMA_LOCATION),
        )
        .with_child(identifier_element(identifier));

    let mut data_inputs = XmlElement::new("wps:DataInputs");
    for (name, value) in inputs {
        let mut input = XmlElement::new("wps:Input").with_child(identifier_element(name.as_ref()));
        match value {
            InputValue::Literal(text) => input.push_child(
                XmlElement::new("wps:Data")
                    .with_child(XmlElement::new("wps:LiteralData").with_text(text.as_str())),
            ),
            InputValue::Complex(renderable) => input.push_child(renderable.to_xml()),
        }
        data_inputs.push_child(input);
    }
    root.push_child(data_inputs);

    if let Some(output) = output {
        root.push_child(
            XmlElement::new("wps:ResponseForm").with_child(
                XmlElement::new("wps:ResponseDocument")
                    .with_attribute("storeExecuteResponse", "true")
                    .with_attribute("status", "true")
                    .with_child(
                        XmlElement::new("wps:Output")
                            .with_attribute("asReference", "true")
                            .with_child(identifier_element(output)),
                    ),
            ),
        );
    }

    debug!(
        "Built Execute request for '{}' with {} inputs",
        identifier,
        inputs.len()
    );

    root
}

fn identifier_element(identifier: &str) -> XmlElement {
    XmlElement::new("ows:Identifier").with_text(identifier)
}
