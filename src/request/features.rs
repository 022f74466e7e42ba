//! Feature Collection Inputs
//!
//! Complex inputs that describe a feature collection, either by reference
//! to a WFS `GetFeature` query or inline as a GML multipolygon. Both render
//! with their own namespace declarations so they can be embedded in any
//! Execute request.

use serde::{Deserialize, Serialize};

use crate::xml::{
    XmlElement, XmlNode, DRAW_NAMESPACE, DRAW_SCHEMA_LOCATION, GML_NAMESPACE, GML_SCHEMA_LOCATION,
    OGC_NAMESPACE, OWS_NAMESPACE_1_0_0, WFS_NAMESPACE, XLINK_NAMESPACE, XSI_NAMESPACE,
};

use super::inputs::XmlRenderable;

const WFS_VERSION: &str = "1.1.0";
const WFS_OUTPUT_FORMAT: &str = "text/xml; subtype=gml/3.1.1";
const WFS_SCHEMA_LOCATION: &str = "../wfs/1.1.0/WFS.xsd";
const EPSG_4326: &str = "http://www.opengis.net/gml/srs/epsg.xml#4326";

/// A WFS query selecting features of one type.
///
/// ```xml
/// <wfs:Query typeName="sample:CONUS_States">
///   <wfs:PropertyName>the_geom</wfs:PropertyName>
///   <wfs:PropertyName>STATE</wfs:PropertyName>
///   <ogc:Filter>
///     <ogc:GmlObjectId gml:id="CONUS_States.508"/>
///   </ogc:Filter>
/// </wfs:Query>
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WfsQuery {
    pub type_name: String,
    #[serde(default)]
    pub property_names: Vec<String>,
    /// GML object ids; empty means no filter
    #[serde(default)]
    pub filters: Vec<String>,
}

impl WfsQuery {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            property_names: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.property_names.push(name.into());
        self
    }

    pub fn with_filter(mut self, gml_id: impl Into<String>) -> Self {
        self.filters.push(gml_id.into());
        self
    }

    pub fn to_element(&self) -> XmlElement {
        let mut query = XmlElement::new("wfs:Query").with_attribute("typeName", self.type_name.as_str());

        for name in &self.property_names {
            query.push_child(XmlElement::new("wfs:PropertyName").with_text(name.as_str()));
        }

        if !self.filters.is_empty() {
            let mut filter = XmlElement::new("ogc:Filter");
            for id in &self.filters {
                filter.push_child(XmlElement::new("ogc:GmlObjectId").with_attribute("gml:id", id.as_str()));
            }
            query.push_child(filter);
        }

        query
    }
}

/// A feature collection fetched by the server from a WFS endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WfsFeatureCollection {
    pub url: String,
    pub query: WfsQuery,
}

impl WfsFeatureCollection {
    pub fn new(url: impl Into<String>, query: WfsQuery) -> Self {
        Self {
            url: url.into(),
            query,
        }
    }
}

impl XmlRenderable for WfsFeatureCollection {
    /// Renders a `wps:Reference` whose body is a `wfs:GetFeature` request.
    fn to_xml(&self) -> XmlNode {
        let get_feature = XmlElement::new("wfs:GetFeature")
            .with_attribute("xmlns:wfs", WFS_NAMESPACE)
            .with_attribute("xmlns:ogc", OGC_NAMESPACE)
            .with_attribute("xmlns:gml", GML_NAMESPACE)
            .with_attribute("xmlns:xsi", XSI_NAMESPACE)
            .with_attribute("service", "WFS")
            .with_attribute("version", WFS_VERSION)
            .with_attribute("outputFormat", WFS_OUTPUT_FORMAT)
            .with_attribute(
                "xsi:schemaLocation",
                format!("{} {}", WFS_NAMESPACE, WFS_SCHEMA_LOCATION),
            )
            .with_child(self.query.to_element());

        XmlElement::new("wps:Reference")
            .with_attribute("xlink:href", self.url.as_str())
            .with_child(XmlElement::new("wps:Body").with_child(get_feature))
            .into()
    }
}

/// An inline feature collection of one GML multipolygon feature.
///
/// Each polygon is a closed ring of `(x, y)` positions in EPSG:4326.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GmlMultiPolygonFeatureCollection {
    pub polygons: Vec<Vec<(f64, f64)>>,
}

impl GmlMultiPolygonFeatureCollection {
    pub fn new(polygons: Vec<Vec<(f64, f64)>>) -> Self {
        Self { polygons }
    }
}

fn pos_list(ring: &[(f64, f64)]) -> String {
    ring.iter()
        .map(|(x, y)| format!("{} {}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

impl XmlRenderable for GmlMultiPolygonFeatureCollection {
    /// Renders `wps:Data/wps:ComplexData` holding a `gml:featureMembers` box.
    fn to_xml(&self) -> XmlNode {
        let mut multi_polygon = XmlElement::new("gml:MultiPolygon")
            .with_attribute("srsDimension", "2")
            .with_attribute("srsName", EPSG_4326);

        for ring in &self.polygons {
            let linear_ring = XmlElement::new("gml:LinearRing")
                .with_child(XmlElement::new("gml:posList").with_text(pos_list(ring)));
            multi_polygon.push_child(
                XmlElement::new("gml:polygonMember").with_child(
                    XmlElement::new("gml:Polygon")
                        .with_child(XmlElement::new("gml:exterior").with_child(linear_ring)),
                ),
            );
        }

        let feature_members = XmlElement::new("gml:featureMembers")
            .with_attribute("xmlns:gml", GML_NAMESPACE)
            .with_attribute("xmlns:ogc", OGC_NAMESPACE)
            .with_attribute("xmlns:draw", DRAW_NAMESPACE)
            .with_attribute("xmlns:ows", OWS_NAMESPACE_1_0_0)
            .with_attribute("xmlns:xlink", XLINK_NAMESPACE)
            .with_attribute("xmlns:xsi", XSI_NAMESPACE)
            .with_attribute(
                "xsi:schemaLocation",
                format!("{} {}", DRAW_NAMESPACE, DRAW_SCHEMA_LOCATION),
            )
            .with_child(
                XmlElement::new("gml:box")
                    .with_attribute("gml:id", "box.1")
                    .with_child(XmlElement::new("gml:the_geom").with_child(multi_polygon))
                    .with_child(XmlElement::new("gml:ID").with_text("0")),
            );

        XmlElement::new("wps:Data")
            .with_child(
                XmlElement::new("wps:ComplexData")
                    .with_attribute("mimeType", "text/xml")
                    .with_attribute("encoding", "UTF-8")
                    .with_attribute("schema", GML_SCHEMA_LOCATION)
                    .with_child(feature_members),
            )
            .into()
    }
}
