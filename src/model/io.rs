//! Process Inputs and Outputs
//!
//! Declared input/output schemas (from DescribeProcess) and the actual
//! values a server echoes or returns in an ExecuteResponse.
//!
//! # Example Declared Input
//!
//! ```xml
//! <Input minOccurs="1" maxOccurs="1">
//!   <ows:Identifier>DELIMITER</ows:Identifier>
//!   <LiteralData>
//!     <ows:DataType ows:reference="xs:string"/>
//!     <ows:AllowedValues>
//!       <ows:Value>COMMA</ows:Value>
//!       <ows:Value>TAB</ows:Value>
//!     </ows:AllowedValues>
//!     <DefaultValue>COMMA</DefaultValue>
//!   </LiteralData>
//! </Input>
//! ```

use roxmltree::Node;
use serde::Serialize;

use crate::error::{Result, WpsError};
use crate::xml::ElementExt;

use super::typed::{convert, normalize_type_tag, TypedValue};

/// Data type tag reported for complex inputs and outputs.
pub const COMPLEX_DATA_TYPE: &str = "ComplexData";

/// Format of a complex payload: MIME type, encoding and schema.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ComplexDataDescriptor {
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub schema: Option<String>,
}

impl ComplexDataDescriptor {
    pub fn new(mime_type: Option<String>, encoding: Option<String>, schema: Option<String>) -> Self {
        Self {
            mime_type,
            encoding,
            schema,
        }
    }

    /// Reads a `<Format>` element (`MimeType`/`Encoding`/`Schema` children).
    pub fn from_format(element: Node) -> Self {
        Self {
            mime_type: element.child_text("MimeType"),
            encoding: element.child_text("Encoding"),
            schema: element.child_text("Schema"),
        }
    }

    /// Reads the `mimeType`/`encoding`/`schema` attributes of a data or reference element.
    pub fn from_attributes(element: Node) -> Self {
        Self {
            mime_type: element.attr("mimeType"),
            encoding: element.attr("encoding"),
            schema: element.attr("schema"),
        }
    }
}

/// Schema of a literal input or output.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LiteralDescriptor {
    /// Primitive type tag without its schema prefix (e.g. "string", "double")
    pub data_type: String,
    /// Allowed values; empty means unrestricted
    pub allowed_values: Vec<TypedValue>,
    /// True when the server declared `AnyValue` explicitly
    pub any_value: bool,
    pub default_value: Option<TypedValue>,
}

/// Schema of a complex input or output.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ComplexDescriptor {
    pub supported: Vec<ComplexDataDescriptor>,
    pub default: Option<ComplexDataDescriptor>,
}

/// The kind of data an input or output carries.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum DataKind {
    Literal(LiteralDescriptor),
    Complex(ComplexDescriptor),
    /// Recognised but not otherwise interpreted
    BoundingBox,
}

/// Fields shared by every input and output.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub identifier: String,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub kind: Option<DataKind>,
}

impl Descriptor {
    /// Parses identifier, title, abstract and the first matching data kind.
    fn from_element(
        element: Node,
        literal_names: &[&str],
        complex_names: &[&str],
        bbox_names: &[&str],
    ) -> Result<Self> {
        let identifier = element
            .child_text("Identifier")
            .ok_or_else(|| WpsError::missing("Identifier", element.local_name()))?;

        let kind = literal_names
            .iter()
            .find_map(|name| element.child_element(name))
            .map(|n| DataKind::Literal(parse_literal(n)))
            .or_else(|| {
                complex_names
                    .iter()
                    .find_map(|name| element.child_element(name))
                    .map(|n| DataKind::Complex(parse_complex(n)))
            })
            .or_else(|| {
                bbox_names
                    .iter()
                    .find_map(|name| element.child_element(name))
                    .map(|_| DataKind::BoundingBox)
            });

        Ok(Self {
            identifier,
            title: element.child_text("Title"),
            abstract_text: element.child_text("Abstract"),
            kind,
        })
    }

    /// Returns `"ComplexData"`, the literal type tag, or `None` if undeclared.
    pub fn data_type(&self) -> Option<&str> {
        match &self.kind {
            Some(DataKind::Literal(literal)) => Some(&literal.data_type),
            Some(DataKind::Complex(_)) => Some(COMPLEX_DATA_TYPE),
            Some(DataKind::BoundingBox) => Some("BoundingBoxData"),
            None => None,
        }
    }

    /// Allowed literal values (empty for non-literal kinds).
    pub fn allowed_values(&self) -> &[TypedValue] {
        match &self.kind {
            Some(DataKind::Literal(literal)) => &literal.allowed_values,
            _ => &[],
        }
    }

    /// Supported complex formats (empty for non-complex kinds).
    pub fn supported_values(&self) -> &[ComplexDataDescriptor] {
        match &self.kind {
            Some(DataKind::Complex(complex)) => &complex.supported,
            _ => &[],
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, Some(DataKind::Literal(_)))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.kind, Some(DataKind::Complex(_)))
    }
}

fn parse_literal(element: Node) -> LiteralDescriptor {
    // <ows:DataType ows:reference="xs:string">string</ows:DataType>
    let data_type = element
        .child_element("DataType")
        .and_then(|dt| {
            dt.attr("reference")
                .map(|r| normalize_type_tag(&r).to_string())
                .or_else(|| dt.text_content())
        })
        .unwrap_or_else(|| "string".to_string());

    let allowed_values = element
        .find_all_path(&["AllowedValues", "Value"])
        .iter()
        .map(|v| convert(&data_type, &v.text_content().unwrap_or_default()))
        .collect();

    let default_value = element
        .child_text("DefaultValue")
        .map(|text| convert(&data_type, &text));

    LiteralDescriptor {
        allowed_values,
        any_value: element.child_element("AnyValue").is_some(),
        default_value,
        data_type,
    }
}

fn parse_complex(element: Node) -> ComplexDescriptor {
    ComplexDescriptor {
        supported: element
            .find_all_path(&["Supported", "Format"])
            .into_iter()
            .map(ComplexDataDescriptor::from_format)
            .collect(),
        default: element
            .find_path(&["Default", "Format"])
            .map(ComplexDataDescriptor::from_format),
    }
}

/// A value echoed back by the server for a submitted input.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum InputData {
    Literal(String),
    Complex {
        data: String,
        format: ComplexDataDescriptor,
    },
    Reference {
        href: String,
        format: ComplexDataDescriptor,
    },
}

/// A process input: its declared schema and, in responses, the echoed value.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Input {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    /// Minimum occurrences (`None` = not specified). Not enforced client-side.
    pub min_occurs: Option<u32>,
    /// Maximum occurrences (`None` = not specified). Not enforced client-side.
    pub max_occurs: Option<u32>,
    pub value: Option<InputData>,
}

impl Input {
    /// Parses an `<Input>` element from a DescribeProcess or ExecuteResponse document.
    pub fn from_element(element: Node) -> Result<Self> {
        let descriptor = Descriptor::from_element(
            element,
            &["LiteralData"],
            &["ComplexData"],
            &["BoundingBoxData"],
        )?;

        Ok(Self {
            descriptor,
            min_occurs: element.attr("minOccurs").and_then(|v| v.parse().ok()),
            max_occurs: element.attr("maxOccurs").and_then(|v| v.parse().ok()),
            value: parse_input_data(element),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.descriptor.identifier
    }
}

fn parse_input_data(element: Node) -> Option<InputData> {
    if let Some(reference) = element.child_element("Reference") {
        return reference.attr("href").map(|href| InputData::Reference {
            href,
            format: ComplexDataDescriptor::from_attributes(reference),
        });
    }

    let data = element.child_element("Data")?;
    if let Some(literal) = data.child_element("LiteralData") {
        return Some(InputData::Literal(literal.text_content().unwrap_or_default()));
    }
    data.child_element("ComplexData").map(|complex| InputData::Complex {
        data: complex.inner_content().unwrap_or_default(),
        format: ComplexDataDescriptor::from_attributes(complex),
    })
}

/// The result carried by an output in an ExecuteResponse.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub enum OutputData {
    /// Not available yet (or a declared output in a process description)
    #[default]
    None,
    /// Result stored on the server, retrievable from `href`
    Reference {
        href: String,
        format: ComplexDataDescriptor,
    },
    /// Result embedded in the response
    Inline {
        data: String,
        format: ComplexDataDescriptor,
    },
}

/// A process output: its declared schema and, in responses, the result.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Output {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    pub data: OutputData,
}

impl Output {
    /// Parses an `<Output>` element from a DescribeProcess or ExecuteResponse document.
    ///
    /// # Example Response Outputs
    ///
    /// ```xml
    /// <wps:Output>
    ///   <ows:Identifier>OUTPUT</ows:Identifier>
    ///   <wps:Reference href="http://host/RetrieveResultServlet?id=42" mimeType="text/csv"/>
    /// </wps:Output>
    /// <wps:Output>
    ///   <ows:Identifier>POLYGON</ows:Identifier>
    ///   <wps:Data>
    ///     <wps:ComplexData mimeType="text/plain">7504912.9 -764109.1</wps:ComplexData>
    ///   </wps:Data>
    /// </wps:Output>
    /// ```
    pub fn from_element(element: Node) -> Result<Self> {
        let mut descriptor = Descriptor::from_element(
            element,
            &["LiteralOutput", "LiteralData"],
            &["ComplexOutput"],
            &["BoundingBoxOutput"],
        )?;

        let data = if let Some(reference) = element.child_element("Reference") {
            match reference.attr("href") {
                Some(href) => OutputData::Reference {
                    href,
                    format: ComplexDataDescriptor::from_attributes(reference),
                },
                None => OutputData::None,
            }
        } else if let Some(data) = element.child_element("Data") {
            parse_inline_output(data, &mut descriptor)
        } else {
            OutputData::None
        };

        Ok(Self { descriptor, data })
    }

    pub fn identifier(&self) -> &str {
        &self.descriptor.identifier
    }

    /// Returns the reference URL, if the result is stored on the server.
    pub fn reference(&self) -> Option<&str> {
        match &self.data {
            OutputData::Reference { href, .. } => Some(href),
            _ => None,
        }
    }

    /// Returns the inline payload, if the result is embedded.
    pub fn data(&self) -> Option<&str> {
        match &self.data {
            OutputData::Inline { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Returns the MIME type of the result, reference or inline.
    pub fn mime_type(&self) -> Option<&str> {
        match &self.data {
            OutputData::Reference { format, .. } | OutputData::Inline { format, .. } => {
                format.mime_type.as_deref()
            }
            OutputData::None => None,
        }
    }

    /// Returns true once a result is available.
    pub fn is_available(&self) -> bool {
        !matches!(self.data, OutputData::None)
    }
}

fn parse_inline_output(data: Node, descriptor: &mut Descriptor) -> OutputData {
    if let Some(complex) = data.child_element("ComplexData") {
        let format = ComplexDataDescriptor::from_attributes(complex);
        if descriptor.kind.is_none() {
            descriptor.kind = Some(DataKind::Complex(ComplexDescriptor {
                supported: Vec::new(),
                default: Some(format.clone()),
            }));
        }
        return OutputData::Inline {
            data: complex.inner_content().unwrap_or_default(),
            format,
        };
    }

    if let Some(literal) = data.child_element("LiteralData") {
        if descriptor.kind.is_none() {
            let data_type = literal
                .attr("dataType")
                .map(|t| normalize_type_tag(&t).to_string())
                .unwrap_or_else(|| "string".to_string());
            descriptor.kind = Some(DataKind::Literal(LiteralDescriptor {
                data_type,
                allowed_values: Vec::new(),
                any_value: false,
                default_value: None,
            }));
        }
        return OutputData::Inline {
            data: literal.text_content().unwrap_or_default(),
            format: ComplexDataDescriptor::default(),
        };
    }

    OutputData::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    const LITERAL_INPUT: &str = r#"
        <Input minOccurs="1" maxOccurs="1" xmlns:ows="http://www.opengis.net/ows/1.1">
            <ows:Identifier>DELIMITER</ows:Identifier>
            <ows:Title>Delimiter</ows:Title>
            <LiteralData>
                <ows:DataType ows:reference="xs:string"/>
                <ows:AllowedValues>
                    <ows:Value>COMMA</ows:Value>
                    <ows:Value>TAB</ows:Value>
                    <ows:Value>SPACE</ows:Value>
                </ows:AllowedValues>
                <DefaultValue>COMMA</DefaultValue>
            </LiteralData>
        </Input>"#;

    const COMPLEX_INPUT: &str = r#"
        <Input minOccurs="0" xmlns:ows="http://www.opengis.net/ows/1.1">
            <ows:Identifier>FEATURE_COLLECTION</ows:Identifier>
            <ComplexData>
                <Default>
                    <Format>
                        <MimeType>text/xml</MimeType>
                        <Encoding>UTF-8</Encoding>
                        <Schema>http://schemas.opengis.net/gml/2.0.0/feature.xsd</Schema>
                    </Format>
                </Default>
                <Supported>
                    <Format>
                        <MimeType>text/xml</MimeType>
                        <Encoding>UTF-8</Encoding>
                        <Schema>http://schemas.opengis.net/gml/2.0.0/feature.xsd</Schema>
                    </Format>
                    <Format>
                        <MimeType>text/xml</MimeType>
                        <Schema>http://schemas.opengis.net/gml/2.1.1/feature.xsd</Schema>
                    </Format>
                </Supported>
            </ComplexData>
        </Input>"#;

    #[test]
    fn test_literal_input_descriptor() {
        let doc = parse_document(LITERAL_INPUT).unwrap();
        let input = Input::from_element(doc.root_element()).unwrap();

        assert_eq!(input.identifier(), "DELIMITER");
        assert_eq!(input.descriptor.title.as_deref(), Some("Delimiter"));
        assert_eq!(input.descriptor.data_type(), Some("string"));
        assert_eq!(input.min_occurs, Some(1));
        assert_eq!(input.max_occurs, Some(1));
        assert_eq!(input.descriptor.allowed_values().len(), 3);
        assert!(input.descriptor.supported_values().is_empty());

        match &input.descriptor.kind {
            Some(DataKind::Literal(literal)) => {
                assert_eq!(
                    literal.default_value,
                    Some(TypedValue::String("COMMA".to_string()))
                );
                assert!(!literal.any_value);
            }
            other => panic!("expected literal kind, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_any_value_and_typed_default() {
        let xml = r#"
            <Input xmlns:ows="http://www.opengis.net/ows/1.1">
                <ows:Identifier>COUNT</ows:Identifier>
                <LiteralData>
                    <ows:DataType ows:reference="xs:integer"/>
                    <ows:AnyValue/>
                    <DefaultValue>10</DefaultValue>
                </LiteralData>
            </Input>"#;
        let doc = parse_document(xml).unwrap();
        let input = Input::from_element(doc.root_element()).unwrap();

        assert_eq!(input.descriptor.data_type(), Some("integer"));
        assert!(input.descriptor.allowed_values().is_empty());
        assert_eq!(input.min_occurs, None);
        match input.descriptor.kind {
            Some(DataKind::Literal(literal)) => {
                assert!(literal.any_value);
                assert_eq!(literal.default_value, Some(TypedValue::Integer(10)));
            }
            other => panic!("expected literal kind, got {:?}", other),
        }
    }

    #[test]
    fn test_complex_input_descriptor() {
        let doc = parse_document(COMPLEX_INPUT).unwrap();
        let input = Input::from_element(doc.root_element()).unwrap();

        assert_eq!(input.descriptor.data_type(), Some(COMPLEX_DATA_TYPE));
        assert!(input.descriptor.allowed_values().is_empty());
        assert_eq!(input.min_occurs, Some(0));
        assert_eq!(input.max_occurs, None);

        let supported = input.descriptor.supported_values();
        assert_eq!(supported.len(), 2);
        assert_eq!(supported[1].encoding, None);
        assert_eq!(
            supported[1].schema.as_deref(),
            Some("http://schemas.opengis.net/gml/2.1.1/feature.xsd")
        );

        match &input.descriptor.kind {
            Some(DataKind::Complex(complex)) => {
                let default = complex.default.as_ref().unwrap();
                assert_eq!(default.mime_type.as_deref(), Some("text/xml"));
                assert_eq!(default.encoding.as_deref(), Some("UTF-8"));
            }
            other => panic!("expected complex kind, got {:?}", other),
        }
    }

    #[test]
    fn test_input_without_identifier_is_structural_error() {
        let doc = parse_document("<Input><LiteralData/></Input>").unwrap();
        let err = Input::from_element(doc.root_element()).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_echoed_literal_input() {
        let xml = r#"
            <wps:Input xmlns:wps="http://www.opengis.net/wps/1.0.0"
                       xmlns:ows="http://www.opengis.net/ows/1.1">
                <ows:Identifier>DATASET_URI</ows:Identifier>
                <wps:Data>
                    <wps:LiteralData>dods://host/dodsC/conus_grid.ncml</wps:LiteralData>
                </wps:Data>
            </wps:Input>"#;
        let doc = parse_document(xml).unwrap();
        let input = Input::from_element(doc.root_element()).unwrap();

        assert_eq!(input.descriptor.kind, None);
        assert_eq!(
            input.value,
            Some(InputData::Literal("dods://host/dodsC/conus_grid.ncml".to_string()))
        );
    }

    #[test]
    fn test_echoed_reference_input() {
        let xml = r#"
            <wps:Input xmlns:wps="http://www.opengis.net/wps/1.0.0"
                       xmlns:ows="http://www.opengis.net/ows/1.1"
                       xmlns:xlink="http://www.w3.org/1999/xlink">
                <ows:Identifier>FEATURE_COLLECTION</ows:Identifier>
                <wps:Reference xlink:href="http://host/geoserver/wfs" mimeType="text/xml"/>
            </wps:Input>"#;
        let doc = parse_document(xml).unwrap();
        let input = Input::from_element(doc.root_element()).unwrap();

        match input.value {
            Some(InputData::Reference { href, format }) => {
                assert_eq!(href, "http://host/geoserver/wfs");
                assert_eq!(format.mime_type.as_deref(), Some("text/xml"));
            }
            other => panic!("expected reference, got {:?}", other),
        }
    }

    #[test]
    fn test_declared_complex_output() {
        let xml = r#"
            <Output xmlns:ows="http://www.opengis.net/ows/1.1">
                <ows:Identifier>OUTPUT</ows:Identifier>
                <ComplexOutput>
                    <Default><Format><MimeType>text/csv</MimeType></Format></Default>
                    <Supported><Format><MimeType>text/csv</MimeType></Format></Supported>
                </ComplexOutput>
            </Output>"#;
        let doc = parse_document(xml).unwrap();
        let output = Output::from_element(doc.root_element()).unwrap();

        assert!(output.descriptor.is_complex());
        assert!(!output.is_available());
        assert_eq!(output.reference(), None);
        assert_eq!(output.data(), None);
    }

    #[test]
    fn test_declared_literal_output() {
        let xml = r#"
            <Output xmlns:ows="http://www.opengis.net/ows/1.1">
                <ows:Identifier>MEAN</ows:Identifier>
                <LiteralOutput><ows:DataType ows:reference="xs:double"/></LiteralOutput>
            </Output>"#;
        let doc = parse_document(xml).unwrap();
        let output = Output::from_element(doc.root_element()).unwrap();

        assert!(output.descriptor.is_literal());
        assert_eq!(output.descriptor.data_type(), Some("double"));
    }

    #[test]
    fn test_reference_output() {
        let xml = r#"
            <wps:Output xmlns:wps="http://www.opengis.net/wps/1.0.0"
                        xmlns:ows="http://www.opengis.net/ows/1.1">
                <ows:Identifier>OUTPUT</ows:Identifier>
                <wps:Reference encoding="UTF-8" mimeType="text/csv"
                    href="http://host/RetrieveResultServlet?id=1318528582026OUTPUT"/>
            </wps:Output>"#;
        let doc = parse_document(xml).unwrap();
        let output = Output::from_element(doc.root_element()).unwrap();

        assert_eq!(
            output.reference(),
            Some("http://host/RetrieveResultServlet?id=1318528582026OUTPUT")
        );
        assert_eq!(output.mime_type(), Some("text/csv"));
        assert_eq!(output.data(), None);
    }

    #[test]
    fn test_inline_complex_output() {
        let xml = r#"
            <ns0:Output xmlns:ns0="http://www.opengis.net/wps/1.0.0"
                        xmlns:ows="http://www.opengis.net/ows/1.1">
                <ows:Identifier>POLYGON</ows:Identifier>
                <ns0:Data>
                    <ns0:ComplexData mimeType="text/plain">
                        7504912.93758151 -764109.175074507
                    </ns0:ComplexData>
                </ns0:Data>
            </ns0:Output>"#;
        let doc = parse_document(xml).unwrap();
        let output = Output::from_element(doc.root_element()).unwrap();

        assert_eq!(output.data(), Some("7504912.93758151 -764109.175074507"));
        assert_eq!(output.mime_type(), Some("text/plain"));
        assert_eq!(output.reference(), None);
        assert_eq!(output.descriptor.data_type(), Some(COMPLEX_DATA_TYPE));
    }

    #[test]
    fn test_inline_literal_output() {
        let xml = r#"
            <wps:Output xmlns:wps="http://www.opengis.net/wps/1.0.0"
                        xmlns:ows="http://www.opengis.net/ows/1.1">
                <ows:Identifier>MEAN</ows:Identifier>
                <wps:Data><wps:LiteralData dataType="xs:double">12.5</wps:LiteralData></wps:Data>
            </wps:Output>"#;
        let doc = parse_document(xml).unwrap();
        let output = Output::from_element(doc.root_element()).unwrap();

        assert_eq!(output.data(), Some("12.5"));
        assert_eq!(output.mime_type(), None);
        assert_eq!(output.descriptor.data_type(), Some("double"));
    }
}
