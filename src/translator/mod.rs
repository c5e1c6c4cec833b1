//! Darwin response normalization.
//!
//! Turns the XML Darwin sends back into stable JSON documents: parse into a
//! generic tree, strip namespace prefixes, find the operation's result and
//! reshape the parts whose cardinality or nesting varies between responses.

pub mod document;
pub mod namespace;
pub mod response;
pub mod tree;

pub use document::{
    DepartureBoard, DepartureGroup, NormalizedDocument, Service, ServicesContainer, StationBoard,
};
pub use namespace::strip_namespaces;
pub use response::{normalize, NormalizeError};
pub use tree::{parse, OneOrMany, XmlMap, XmlParseError, XmlValue};
