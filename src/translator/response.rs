use crate::darwin::{OperationId, OperationKind};

use super::document::{DepartureBoard, NormalizedDocument, StationBoard};
use super::namespace::strip_namespaces;
use super::tree::{self, XmlMap, XmlParseError, XmlValue};

const BODY_ELEMENT: &str = "Body";

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// The response parsed, but the result container for the operation is missing.
    #[error("malformed {operation} response: missing <{element}>")]
    MalformedUpstreamResponse {
        operation: OperationId,
        element: &'static str,
    },

    #[error(transparent)]
    Parser(#[from] XmlParseError),
}

/// Turns a raw Darwin SOAP response into the JSON-ready document for `operation`.
pub fn normalize(xml: &str, operation: OperationId) -> Result<NormalizedDocument, NormalizeError> {
    let raw = tree::parse(xml)?;
    let stripped = strip_namespaces(&raw);
    let result = locate_result(stripped, operation)?;

    let document = match operation.kind() {
        OperationKind::Board => NormalizedDocument::StationBoard(StationBoard::from_result(result)),
        OperationKind::ServiceDetails => NormalizedDocument::service_details(result),
        OperationKind::NextDepartures => {
            NormalizedDocument::DepartureBoard(DepartureBoard::from_result(result))
        }
    };

    Ok(document)
}

/// Walks `Body -> <operation response> -> <result>` in a namespace-stripped tree.
pub fn locate_result(tree: XmlValue, operation: OperationId) -> Result<XmlMap, NormalizeError> {
    let spec = operation.spec();
    let missing = |element| NormalizeError::MalformedUpstreamResponse { operation, element };

    let envelope = tree.into_map().ok_or_else(|| missing(BODY_ELEMENT))?;
    let body = child_map(envelope, BODY_ELEMENT).ok_or_else(|| missing(BODY_ELEMENT))?;
    let response = child_map(body, spec.response_element)
        .ok_or_else(|| missing(spec.response_element))?;

    child_map(response, spec.result_key).ok_or_else(|| missing(spec.result_key))
}

fn child_map(mut parent: XmlMap, key: &str) -> Option<XmlMap> {
    parent.shift_remove(key).and_then(XmlValue::into_map)
}
