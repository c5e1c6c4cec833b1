use crate::translator::namespace::strip_namespaces;
use crate::translator::tree::{parse, XmlMap, XmlValue, TEXT_KEY};

const SERVICE_NOT_FOUND_REASON: &str = "invalid service id";

/// The reason Darwin gives when it rejects a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub reason: String,
    pub code: Option<String>,
}

impl SoapFault {
    /// Reads a SOAP 1.2 (`Reason/Text`) or SOAP 1.1 (`faultstring`) fault.
    /// Returns `None` when `body` is not a fault document.
    pub fn parse(body: &str) -> Option<Self> {
        let tree = strip_namespaces(&parse(body).ok()?);
        let fault = tree
            .as_map()
            .and_then(|envelope| envelope.get("Body"))
            .and_then(XmlValue::as_map)
            .and_then(|body| body.get("Fault"))
            .and_then(XmlValue::as_map)?;

        let reason = child(fault, "Reason")
            .and_then(|reason| reason.get("Text"))
            .and_then(text_of)
            .or_else(|| fault.get("faultstring").and_then(text_of))?;

        let code = child(fault, "Code")
            .and_then(|code| code.get("Value"))
            .and_then(text_of)
            .or_else(|| fault.get("faultcode").and_then(text_of));

        Some(Self { reason, code })
    }

    pub fn is_service_not_found(&self) -> bool {
        self.reason.to_lowercase().contains(SERVICE_NOT_FOUND_REASON)
    }
}

fn child<'a>(map: &'a XmlMap, key: &str) -> Option<&'a XmlMap> {
    map.get(key).and_then(XmlValue::as_map)
}

// `<Text xml:lang="en">reason</Text>` parses to `{ "$": .., "_": reason }`.
fn text_of(value: &XmlValue) -> Option<String> {
    let text = match value {
        XmlValue::Text(text) => text.as_str(),
        XmlValue::Map(map) => map.get(TEXT_KEY)?.as_text()?,
        XmlValue::List(items) => return items.first().and_then(text_of),
    };
    (!text.is_empty()).then(|| text.to_string())
}
