//! Execute Input Values
//!
//! An input value is either literal text or a complex payload that knows how
//! to render itself as XML. The set is closed at the type level, so there is
//! no way to pass a value the request builder cannot serialize.

use std::fmt;

use roxmltree::Document;

use crate::error::{Result, WpsError};
use crate::xml::{
    XmlNode, GML_NAMESPACE, OGC_NAMESPACE, OWS_NAMESPACE, WFS_NAMESPACE, WPS_NAMESPACE,
    XLINK_NAMESPACE, XSI_NAMESPACE,
};

/// A complex input payload that renders its own XML.
///
/// The returned node is placed inside `wps:Input`, after its
/// `ows:Identifier`, so it is normally a `wps:Data` or `wps:Reference`
/// element.
pub trait XmlRenderable: fmt::Debug + Send + Sync {
    fn to_xml(&self) -> XmlNode;
}

/// A value supplied for one process input.
#[derive(Debug)]
pub enum InputValue {
    /// Plain text, sent as `wps:Data/wps:LiteralData`
    Literal(String),
    /// A payload rendered by the value itself
    Complex(Box<dyn XmlRenderable>),
}

impl InputValue {
    /// Wraps a renderable payload.
    pub fn complex(value: impl XmlRenderable + 'static) -> Self {
        Self::Complex(Box::new(value))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

/// Namespaces a fragment may use without declaring them itself.
const FRAGMENT_PREFIXES: &[(&str, &str)] = &[
    ("wps", WPS_NAMESPACE),
    ("ows", OWS_NAMESPACE),
    ("xlink", XLINK_NAMESPACE),
    ("xsi", XSI_NAMESPACE),
    ("wfs", WFS_NAMESPACE),
    ("ogc", OGC_NAMESPACE),
    ("gml", GML_NAMESPACE),
];

/// A caller-supplied XML fragment, checked for well-formedness.
///
/// # Example
///
/// ```
/// use wpsclient::request::RawFragment;
///
/// let fragment = RawFragment::parse(
///     r#"<wps:Reference xlink:href="http://host/data.xml"/>"#,
/// ).unwrap();
/// assert!(RawFragment::parse("<wps:Data>").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    xml: String,
}

impl RawFragment {
    /// Validates `xml` and wraps it.
    ///
    /// The standard WPS prefixes (`wps`, `ows`, `xlink`, `xsi`, `wfs`,
    /// `ogc`, `gml`) are in scope during the check, matching the
    /// declarations the fragment will inherit once embedded.
    ///
    /// # Errors
    ///
    /// Returns [`WpsError::InvalidFragment`] if the text is empty or not
    /// well-formed.
    pub fn parse(xml: impl Into<String>) -> Result<Self> {
        let xml = xml.into();
        if xml.trim().is_empty() {
            return Err(WpsError::InvalidFragment("fragment is empty".to_string()));
        }

        let declarations: String = FRAGMENT_PREFIXES
            .iter()
            .map(|(prefix, ns)| format!(" xmlns:{}=\"{}\"", prefix, ns))
            .collect();
        let wrapped = format!("<fragment{}>{}</fragment>", declarations, xml);

        Document::parse(&wrapped).map_err(|e| WpsError::InvalidFragment(e.to_string()))?;

        Ok(Self { xml })
    }

    pub fn as_str(&self) -> &str {
        &self.xml
    }
}

impl XmlRenderable for RawFragment {
    fn to_xml(&self) -> XmlNode {
        XmlNode::Raw(self.xml.clone())
    }
}
