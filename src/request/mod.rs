//! Request Building Module
//!
//! Construction of WPS Execute documents.
//!
//! # Structure
//!
//! - [`inputs`]: Input values and the [`XmlRenderable`] capability
//! - [`builder`]: The Execute document builder
//! - [`features`]: WFS and GML feature-collection inputs

pub mod builder;
pub mod features;
pub mod inputs;

pub use builder::build_execute_request;
pub use features::{GmlMultiPolygonFeatureCollection, WfsFeatureCollection, WfsQuery};
pub use inputs::{InputValue, RawFragment, XmlRenderable};
