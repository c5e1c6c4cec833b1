//! Normalized documents returned to HTTP clients.
//!
//! Every type here serializes to the JSON shape clients see. Fields the
//! gateway does not reshape are carried through untouched in `fields`.

use serde::Serialize;

use super::tree::{XmlMap, XmlValue, ATTRIBUTES_KEY};

const LOCATION_KEY: &str = "location";
const LOCATION_FIELDS: [&str; 2] = ["origin", "destination"];

/// One service occurrence (train, bus or ferry) on a board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Service(XmlMap);

impl Service {
    /// A non-mapping value (an empty `<service/>`) becomes an empty record.
    pub fn from_value(value: XmlValue) -> Self {
        match value {
            XmlValue::Map(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &XmlMap {
        &self.0
    }

    /// Unwraps `origin`/`destination` values of the form `{location: {...}}`.
    /// Every other field is left as it is.
    pub fn with_flat_locations(mut self) -> Self {
        for key in LOCATION_FIELDS {
            if let Some(value) = self.0.get_mut(key) {
                let wrapped = std::mem::replace(value, XmlValue::Text(String::new()));
                *value = unwrap_location(wrapped);
            }
        }
        self
    }
}

impl From<XmlMap> for Service {
    fn from(map: XmlMap) -> Self {
        Self(map)
    }
}

fn unwrap_location(value: XmlValue) -> XmlValue {
    match value {
        XmlValue::Map(mut wrapper) => match wrapper.shift_remove(LOCATION_KEY) {
            // `<location/>` still yields an object
            Some(XmlValue::Text(text)) if text.is_empty() => XmlValue::Map(XmlMap::new()),
            Some(location) => location,
            None => XmlValue::Map(wrapper),
        },
        other => other,
    }
}

/// Resolves a `service` field to a list of flattened services.
pub fn normalize_services(value: Option<XmlValue>) -> Vec<Service> {
    let Some(value) = value else {
        return Vec::new();
    };

    value
        .into_one_or_many()
        .into_vec()
        .into_iter()
        .map(|service| Service::from_value(service).with_flat_locations())
        .collect()
}

/// `trainServices`, `busServices` or `ferryServices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicesContainer {
    pub service: Vec<Service>,
    #[serde(flatten)]
    pub extra: XmlMap,
}

impl ServicesContainer {
    pub fn from_value(value: XmlValue) -> Self {
        let mut service = Vec::new();
        let mut extra = XmlMap::new();

        for container in value.into_one_or_many().into_vec() {
            if let XmlValue::Map(mut map) = container {
                service.extend(normalize_services(map.shift_remove("service")));
                extra.extend(map);
            }
        }

        Self { service, extra }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBoard {
    #[serde(flatten)]
    pub fields: XmlMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_services: Option<ServicesContainer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_services: Option<ServicesContainer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ferry_services: Option<ServicesContainer>,
}

impl StationBoard {
    pub fn from_result(mut result: XmlMap) -> Self {
        let mut container = |key: &str| result.shift_remove(key).map(ServicesContainer::from_value);
        let train_services = container("trainServices");
        let bus_services = container("busServices");
        let ferry_services = container("ferryServices");

        Self {
            fields: without_attributes(result),
            train_services,
            bus_services,
            ferry_services,
        }
    }
}

/// Next service to one destination on a next-departures board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureGroup {
    pub crs: String,
    pub service: Service,
}

impl DepartureGroup {
    /// Returns `None` when the group has no CRS code or no service.
    pub fn from_value(value: XmlValue) -> Option<Self> {
        let mut group = value.into_map()?;
        let crs = group_crs(&group)?.to_string();
        let service = group
            .shift_remove("service")?
            .into_one_or_many()
            .into_first()?
            .into_map()?;

        Some(Self {
            crs,
            service: Service::from(service).with_flat_locations(),
        })
    }
}

// The `crs` attribute wins over a `crs` child element.
fn group_crs(group: &XmlMap) -> Option<&str> {
    let from_attribute = group
        .get(ATTRIBUTES_KEY)
        .and_then(XmlValue::as_map)
        .and_then(|attributes| attributes.get("crs"))
        .and_then(non_empty_text);

    from_attribute.or_else(|| group.get("crs").and_then(non_empty_text))
}

fn non_empty_text(value: &XmlValue) -> Option<&str> {
    value.as_text().filter(|text| !text.is_empty())
}

/// Resolves a `departures` element to one group per destination.
pub fn normalize_departures(value: XmlValue) -> Vec<DepartureGroup> {
    value
        .into_one_or_many()
        .into_vec()
        .into_iter()
        .filter_map(XmlValue::into_map)
        .filter_map(|mut departures| departures.shift_remove("destination"))
        .flat_map(|destinations| destinations.into_one_or_many().into_vec())
        .filter_map(DepartureGroup::from_value)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureBoard {
    #[serde(flatten)]
    pub fields: XmlMap,
    /// `None` when the response had no `departures` element at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departures: Option<Vec<DepartureGroup>>,
}

impl DepartureBoard {
    pub fn from_result(mut result: XmlMap) -> Self {
        let departures = result.shift_remove("departures").map(normalize_departures);

        Self {
            fields: without_attributes(result),
            departures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NormalizedDocument {
    StationBoard(StationBoard),
    ServiceDetails(Service),
    DepartureBoard(DepartureBoard),
}

impl NormalizedDocument {
    pub fn service_details(result: XmlMap) -> Self {
        NormalizedDocument::ServiceDetails(Service::from(without_attributes(result)))
    }
}

fn without_attributes(mut fields: XmlMap) -> XmlMap {
    fields.shift_remove(ATTRIBUTES_KEY);
    fields
}
