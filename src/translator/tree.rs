//! Generic XML tree.
//!
//! Darwin responses are parsed into an untyped tree first and shaped later.
//! The tree keeps the parser's "auto array" behaviour: an element that occurs
//! once under its parent is stored as a single value, an element that occurs
//! more than once becomes a [`XmlValue::List`]. Attributes are kept apart from
//! child elements under the [`ATTRIBUTES_KEY`] key.

use indexmap::IndexMap;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

/// Key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "$";

/// Key holding an element's text when it also has attributes or children.
pub const TEXT_KEY: &str = "_";

/// Deepest element nesting accepted. Later passes walk the tree recursively.
pub const MAX_DEPTH: usize = 256;

/// Insertion-ordered mapping of element names to values.
pub type XmlMap = IndexMap<String, XmlValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    Text(String),
    List(Vec<XmlValue>),
    Map(XmlMap),
}

impl XmlValue {
    pub fn as_map(&self) -> Option<&XmlMap> {
        match self {
            XmlValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<XmlMap> {
        match self {
            XmlValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Resolves the single-vs-list ambiguity of a repeatable element.
    pub fn into_one_or_many(self) -> OneOrMany<XmlValue> {
        match self {
            XmlValue::List(items) => OneOrMany::Many(items),
            other => OneOrMany::One(other),
        }
    }
}

/// A repeatable element as the parser hands it over: one occurrence or many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.into_iter().next(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum XmlParseError {
    #[error("invalid XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("invalid XML attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("unexpected end of document inside <{0}>")]
    UnclosedElement(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// An element still being read.
struct Frame {
    name: String,
    attributes: XmlMap,
    children: XmlMap,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlParseError> {
        let mut attributes = XmlMap::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.trim().to_string();
            attributes.insert(key, XmlValue::Text(value));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: XmlMap::new(),
            text: String::new(),
        })
    }

    fn attach(&mut self, name: String, value: XmlValue) {
        match self.children.get_mut(&name) {
            Some(XmlValue::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, XmlValue::List(Vec::new()));
                *existing = XmlValue::List(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn close(self) -> (String, XmlValue) {
        let text = self.text.trim();

        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, XmlValue::Text(text.to_string()));
        }

        let mut map = XmlMap::new();
        if !self.attributes.is_empty() {
            map.insert(ATTRIBUTES_KEY.to_string(), XmlValue::Map(self.attributes));
        }
        map.extend(self.children);
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), XmlValue::Text(text.to_string()));
        }

        (self.name, XmlValue::Map(map))
    }
}

/// Parses an XML document into a tree.
///
/// The root element's own name is dropped: the returned value is the root's
/// content, so for a SOAP response the top-level keys are `soap:Header`,
/// `soap:Body` and the envelope's attribute bag. Prefixes are kept as-is.
pub fn parse(xml: &str) -> Result<XmlValue, XmlParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                check_depth(stack.len())?;
                stack.push(Frame::open(&e)?);
            }
            Event::Empty(e) => {
                check_depth(stack.len())?;
                let (name, value) = Frame::open(&e)?.close();
                match stack.last_mut() {
                    Some(parent) => parent.attach(name, value),
                    None => root = Some(value),
                }
            }
            Event::End(_) => {
                // quick-xml checks that end names match, so the top frame is ours.
                if let Some(frame) = stack.pop() {
                    let (name, value) = frame.close();
                    match stack.last_mut() {
                        Some(parent) => parent.attach(name, value),
                        None => root = Some(value),
                    }
                }
            }
            Event::Text(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(XmlParseError::UnclosedElement(frame.name));
    }

    root.ok_or(XmlParseError::NoRoot)
}

// `open` is the number of elements enclosing the one about to start.
fn check_depth(open: usize) -> Result<(), XmlParseError> {
    if open >= MAX_DEPTH {
        return Err(XmlParseError::TooDeep(MAX_DEPTH));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json(value: &XmlValue) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn test_single_and_repeated_children() {
        let xml = r#"<root>
            <trainServices>
                <service><sta>09:52</sta></service>
            </trainServices>
            <busServices>
                <service><sta>10:00</sta></service>
                <service><sta>10:30</sta></service>
            </busServices>
        </root>"#;

        let tree = parse(xml).unwrap();
        assert_eq!(
            to_json(&tree),
            json!({
                "trainServices": { "service": { "sta": "09:52" } },
                "busServices": { "service": [ { "sta": "10:00" }, { "sta": "10:30" } ] }
            })
        );
    }

    #[test]
    fn test_attributes_are_kept_apart() {
        let xml = r#"<departures>
            <destination crs="YRK"><service><std>19:38</std></service></destination>
            <note lang="en">Delayed</note>
            <marker kind="x"/>
        </departures>"#;

        let tree = parse(xml).unwrap();
        assert_eq!(
            to_json(&tree),
            json!({
                "destination": { "$": { "crs": "YRK" }, "service": { "std": "19:38" } },
                "note": { "$": { "lang": "en" }, "_": "Delayed" },
                "marker": { "$": { "kind": "x" } }
            })
        );
    }

    #[test]
    fn test_text_is_trimmed_and_empty_elements_are_empty_strings() {
        let xml = "<root><platform>  12A  </platform><trainServices/><eta></eta></root>";

        let tree = parse(xml).unwrap();
        assert_eq!(
            to_json(&tree),
            json!({ "platform": "12A", "trainServices": "", "eta": "" })
        );
    }

    #[test]
    fn test_prefixes_and_entities_are_preserved() {
        let xml = r#"<soap:Envelope xmlns:soap="urn:x"><soap:Body><lt:name>A &amp; B</lt:name></soap:Body></soap:Envelope>"#;

        let tree = parse(xml).unwrap();
        let map = tree.as_map().unwrap();
        assert_eq!(
            map.get("$").and_then(|a| a.as_map()).and_then(|a| a.get("xmlns:soap")),
            Some(&XmlValue::Text("urn:x".to_string()))
        );
        let body = map.get("soap:Body").and_then(XmlValue::as_map).unwrap();
        assert_eq!(body.get("lt:name"), Some(&XmlValue::Text("A & B".to_string())));
    }

    #[test]
    fn test_invalid_xml_fails() {
        assert!(parse("<a><b></a>").is_err());
        assert!(parse("<a><b>").is_err());
        assert!(matches!(parse("   "), Err(XmlParseError::NoRoot)));
    }

    fn nested(depth: usize, leaf: &str) -> String {
        format!("{}{}{}", "<a>".repeat(depth), leaf, "</a>".repeat(depth))
    }

    #[test]
    fn test_nesting_limit() {
        assert!(parse(&nested(MAX_DEPTH, "x")).is_ok());
        assert!(parse(&nested(MAX_DEPTH - 1, "<b/>")).is_ok());

        assert!(matches!(
            parse(&nested(MAX_DEPTH, "<b/>")),
            Err(XmlParseError::TooDeep(MAX_DEPTH))
        ));
        assert!(matches!(
            parse(&nested(50_000, "x")),
            Err(XmlParseError::TooDeep(_))
        ));
    }

    #[test]
    fn test_one_or_many() {
        let one = XmlValue::Text("a".into()).into_one_or_many();
        assert_eq!(one.clone().into_vec(), vec![XmlValue::Text("a".into())]);

        let many = XmlValue::List(vec![XmlValue::Text("a".into()), XmlValue::Text("b".into())])
            .into_one_or_many();
        assert_eq!(many.into_first(), Some(XmlValue::Text("a".into())));
        assert_eq!(OneOrMany::<XmlValue>::Many(vec![]).into_first(), None);
    }
}
