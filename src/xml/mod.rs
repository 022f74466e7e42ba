//! XML Support Module
//!
//! Reading and writing of the XML documents exchanged with a WPS server.
//!
//! # Structure
//!
//! - [`reader`]: Lookup helpers over parsed `roxmltree` documents
//! - [`writer`]: Element tree used to build and serialize requests

pub mod reader;
pub mod writer;

pub use reader::{parse_document, ElementExt};
pub use writer::{XmlElement, XmlNode};

/// Default WPS protocol version.
pub const WPS_DEFAULT_VERSION: &str = "1.0.0";

/// WPS 1.0.0 namespace.
pub const WPS_NAMESPACE: &str = "http://www.opengis.net/wps/1.0.0";

/// Schema location of the Execute request.
pub const WPS_SCHEMA_LOCATION: &str = "http://schemas.opengis.net/wps/1.0.0/wpsExecute_request.xsd";

/// OWS 1.1 namespace used by WPS 1.0.0 documents.
pub const OWS_NAMESPACE: &str = "http://www.opengis.net/ows/1.1";

/// Legacy OWS 1.0 namespace (still emitted inside GML feature members).
pub const OWS_NAMESPACE_1_0_0: &str = "http://www.opengis.net/ows";

pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub const WFS_NAMESPACE: &str = "http://www.opengis.net/wfs";
pub const OGC_NAMESPACE: &str = "http://www.opengis.net/ogc";

pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml";
pub const GML_SCHEMA_LOCATION: &str = "http://schemas.opengis.net/gml/3.1.1/base/feature.xsd";

pub const DRAW_NAMESPACE: &str = "gov.usgs.cida.gdp.draw";
pub const DRAW_SCHEMA_LOCATION: &str = "http://cida.usgs.gov/qa/climate/derivative/xsd/draw.xsd";
