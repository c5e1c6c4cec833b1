//! Query-string and path parameters turned into Darwin request options.

use std::str::FromStr;

use crate::darwin::{BoardOptions, Crs, FilterType, NextDeparturesOptions};

use super::error::ApiError;

pub const DEFAULT_NUM_ROWS: u16 = 10;

/// Raw query pairs in request order. Repeated keys are kept.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(pub Vec<(String, String)>);

impl QueryParams {
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn number<T: FromStr>(&self, key: &str) -> Result<Option<T>, ApiError> {
        match self.first(key).map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ApiError::BadRequest(format!("invalid '{}'", key))),
            None => Ok(None),
        }
    }
}

pub fn board_options(crs: &str, query: &QueryParams) -> Result<BoardOptions, ApiError> {
    let filter_crs = match query.first("filterCrs").filter(|v| !v.trim().is_empty()) {
        Some(code) => Some(
            code.parse::<Crs>()
                .map_err(|_| ApiError::BadRequest("invalid 'filterCrs'".to_string()))?,
        ),
        None => None,
    };
    let filter_type = filter_crs
        .as_ref()
        .map(|_| FilterType::from_query(query.first("filterType")));

    Ok(BoardOptions {
        crs: crs.parse()?,
        num_rows: Some(query.number("numRows")?.unwrap_or(DEFAULT_NUM_ROWS)),
        filter_crs,
        filter_type,
        time_offset: query.number("timeOffset")?,
        time_window: query.number("timeWindow")?,
    })
}

/// `destinationCrs` may repeat or hold a comma-separated list.
/// Entries that are not three letters are skipped.
pub fn next_departures_options(
    crs: &str,
    query: &QueryParams,
) -> Result<NextDeparturesOptions, ApiError> {
    let crs: Crs = crs.parse()?;

    let destinations: Vec<Crs> = query
        .all("destinationCrs")
        .flat_map(|value| value.split(','))
        .filter_map(|code| code.parse().ok())
        .collect();
    if destinations.is_empty() {
        return Err(ApiError::BadRequest("No 'destinationCrs' provided".to_string()));
    }

    Ok(NextDeparturesOptions {
        crs,
        destinations,
        time_offset: query.number("timeOffset")?,
        time_window: query.number("timeWindow")?,
    })
}
