//! Job Definition Model
//!
//! A job file describes one process execution against one service.
//!
//! # Example YAML Format
//!
//! ```yaml
//! url: http://cida.usgs.gov/gdp/process/WebProcessingService
//! process: gov.usgs.cida.gdp.wps.algorithm.FeatureWeightedGridStatisticsAlgorithm
//! output: OUTPUT
//! poll_interval: 10
//! max_polls: 360
//!
//! inputs:
//!   - id: DATASET_URI
//!     value: dods://cida.usgs.gov/qa/thredds/dodsC/prism
//!   - id: DATASET_ID
//!     value: [ppt, tmx]
//!   - id: FEATURE_COLLECTION
//!     wfs:
//!       url: http://igsarm-cida-gdp2.er.usgs.gov:8082/geoserver/wfs
//!       query:
//!         type_name: sample:CONUS_States
//!         property_names: [the_geom, STATE]
//!         filters: [CONUS_States.508]
//! ```

use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::execution::DEFAULT_POLL_INTERVAL;
use crate::request::{
    GmlMultiPolygonFeatureCollection, InputValue, RawFragment, WfsFeatureCollection,
};
use crate::transport::Credentials;
use crate::xml::WPS_DEFAULT_VERSION;

/// One input of a job. Exactly one of the value kinds must be set.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InputSpec {
    /// Process input identifier
    pub id: String,

    /// Literal value(s); a list repeats the input once per value
    #[serde(deserialize_with = "scalar_or_vec", default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<String>,

    /// Raw XML fragment placed inside `wps:Input`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml: Option<String>,

    /// Feature collection fetched by the server from a WFS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wfs: Option<WfsFeatureCollection>,

    /// Inline GML multipolygon, one ring of `[x, y]` pairs per polygon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygons: Option<Vec<Vec<(f64, f64)>>>,
}

/// Deserializes a scalar or a list of scalars into strings.
///
/// Numbers and booleans keep their YAML spelling, so `value: 2010` is the
/// literal `"2010"`.
fn scalar_or_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn scalar<E: de::Error>(value: Value) -> std::result::Result<String, E> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(de::Error::custom("Expected a string, number or boolean")),
        }
    }

    let val = Value::deserialize(deserializer)?;
    match val {
        Value::Null => Ok(Vec::new()),
        Value::Array(arr) => arr.into_iter().map(scalar).collect(),
        other => Ok(vec![scalar(other)?]),
    }
}

impl InputSpec {
    /// Creates an input with a single literal value.
    pub fn literal(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: vec![value.into()],
            ..Default::default()
        }
    }

    /// Number of value kinds set on this input.
    pub fn kind_count(&self) -> usize {
        [
            !self.value.is_empty(),
            self.xml.is_some(),
            self.wfs.is_some(),
            self.polygons.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// Converts this input into request values, one per occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`WpsError::InvalidFragment`](crate::WpsError::InvalidFragment)
    /// for a malformed `xml` value.
    pub fn to_values(&self) -> Result<Vec<InputValue>> {
        if let Some(xml) = &self.xml {
            return Ok(vec![InputValue::complex(RawFragment::parse(xml.as_str())?)]);
        }
        if let Some(wfs) = &self.wfs {
            return Ok(vec![InputValue::complex(wfs.clone())]);
        }
        if let Some(polygons) = &self.polygons {
            return Ok(vec![InputValue::complex(GmlMultiPolygonFeatureCollection::new(
                polygons.clone(),
            ))]);
        }
        Ok(self.value.iter().map(|v| InputValue::from(v.as_str())).collect())
    }
}

/// Default poll interval in seconds.
fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_version() -> String {
    WPS_DEFAULT_VERSION.to_string()
}

/// A complete job definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JobSpec {
    /// Service endpoint
    pub url: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    /// Process identifier
    pub process: String,

    #[serde(default)]
    pub inputs: Vec<InputSpec>,

    /// Output requested by reference; when set the job runs asynchronously
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Seconds between status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Upper bound on status polls (unbounded when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_polls: Option<u32>,
}

impl JobSpec {
    /// Creates a job with no inputs.
    ///
    /// # Example
    ///
    /// ```
    /// use wpsclient::job::{InputSpec, JobSpec};
    ///
    /// let job = JobSpec::new("http://host/wps", "EchoProcess")
    ///     .with_input(InputSpec::literal("message", "hello"))
    ///     .with_output("message");
    /// assert_eq!(job.inputs.len(), 1);
    /// ```
    pub fn new(url: impl Into<String>, process: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            version: default_version(),
            credentials: None,
            process: process.into(),
            inputs: Vec::new(),
            output: None,
            poll_interval: default_poll_interval(),
            max_polls: None,
        }
    }

    pub fn with_input(mut self, input: InputSpec) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    /// Flattens the job inputs into ordered request pairs.
    pub fn to_inputs(&self) -> Result<Vec<(String, InputValue)>> {
        let mut pairs = Vec::new();
        for input in &self.inputs {
            for value in input.to_values()? {
                pairs.push((input.id.clone(), value));
            }
        }
        Ok(pairs)
    }
}
