use std::fmt;
use std::str::FromStr;

use super::operation::OperationKind;

/// Three-letter station code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Crs(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CRS code '{0}'")]
pub struct InvalidCrs(pub String);

impl Crs {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Crs {
    type Err = InvalidCrs;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(InvalidCrs(code.to_string()))
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `filterCrs` names where services go to or where they come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    To,
    From,
}

impl FilterType {
    /// Anything other than `"from"` means `To`.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("from") => FilterType::From,
            _ => FilterType::To,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::To => "to",
            FilterType::From => "from",
        }
    }
}

/// Parameters shared by every station board operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardOptions {
    pub crs: Crs,
    pub num_rows: Option<u16>,
    pub filter_crs: Option<Crs>,
    pub filter_type: Option<FilterType>,
    pub time_offset: Option<i16>,
    pub time_window: Option<u16>,
}

impl BoardOptions {
    pub fn new(crs: Crs) -> Self {
        Self {
            crs,
            num_rows: None,
            filter_crs: None,
            filter_type: None,
            time_offset: None,
            time_window: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDetailsOptions {
    pub service_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextDeparturesOptions {
    pub crs: Crs,
    pub destinations: Vec<Crs>,
    pub time_offset: Option<i16>,
    pub time_window: Option<u16>,
}

/// Parameters for one Darwin request, by operation family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestParams {
    Board(BoardOptions),
    ServiceDetails(ServiceDetailsOptions),
    NextDepartures(NextDeparturesOptions),
}

impl RequestParams {
    pub fn kind(&self) -> OperationKind {
        match self {
            RequestParams::Board(_) => OperationKind::Board,
            RequestParams::ServiceDetails(_) => OperationKind::ServiceDetails,
            RequestParams::NextDepartures(_) => OperationKind::NextDepartures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_parsing() {
        assert_eq!("lds".parse::<Crs>().unwrap().as_str(), "LDS");
        assert_eq!(" Yrk ".parse::<Crs>().unwrap().to_string(), "YRK");
        assert!("LEEDS".parse::<Crs>().is_err());
        assert!("L1S".parse::<Crs>().is_err());
        assert!("".parse::<Crs>().is_err());
    }

    #[test]
    fn test_filter_type_defaults_to_to() {
        assert_eq!(FilterType::from_query(Some("from")), FilterType::From);
        assert_eq!(FilterType::from_query(Some("to")), FilterType::To);
        assert_eq!(FilterType::from_query(Some("sideways")), FilterType::To);
        assert_eq!(FilterType::from_query(None), FilterType::To);
        assert_eq!(FilterType::From.as_str(), "from");
    }
}
