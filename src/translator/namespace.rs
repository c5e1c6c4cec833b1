use super::tree::{XmlMap, XmlValue};

const PREFIX_SEPARATOR: char = ':';

/// Returns the key without its namespace prefix (`"ldb:crs"` -> `"crs"`).
pub fn strip_prefix(key: &str) -> &str {
    match key.split_once(PREFIX_SEPARATOR) {
        Some((_, local)) => local,
        None => key,
    }
}

/// Rebuilds `value` with every mapping key stripped of its namespace prefix.
///
/// Two keys that collapse to the same local name within one mapping keep the
/// position of the first and the value of the last.
pub fn strip_namespaces(value: &XmlValue) -> XmlValue {
    match value {
        XmlValue::Text(text) => XmlValue::Text(text.clone()),
        XmlValue::List(items) => XmlValue::List(items.iter().map(strip_namespaces).collect()),
        XmlValue::Map(map) => {
            let mut stripped = XmlMap::with_capacity(map.len());
            for (key, child) in map {
                stripped.insert(strip_prefix(key).to_string(), strip_namespaces(child));
            }
            XmlValue::Map(stripped)
        }
    }
}
