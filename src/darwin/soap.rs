//! SOAP 1.2 request envelopes for the Darwin LDB web service.

use quick_xml::escape::escape;

use super::error::DarwinError;
use super::operation::OperationId;
use super::types::{BoardOptions, NextDeparturesOptions, RequestParams, ServiceDetailsOptions};

pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const TOKEN_TYPES_NS: &str = "http://thalesgroup.com/RTTI/2013-11-28/Token/types";
const LDB_NS: &str = "http://thalesgroup.com/RTTI/2017-10-01/ldb/";

/// One child of the request element, in the order Darwin expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestElement {
    Value {
        name: &'static str,
        value: String,
    },
    List {
        name: &'static str,
        item: &'static str,
        values: Vec<String>,
    },
}

impl RequestElement {
    fn value(name: &'static str, value: impl ToString) -> Self {
        RequestElement::Value {
            name,
            value: value.to_string(),
        }
    }

    fn write_to(&self, xml: &mut String) {
        match self {
            RequestElement::Value { name, value } => {
                xml.push_str(&format!("<ldb:{}>{}</ldb:{}>", name, escape(value.as_str()), name));
            }
            RequestElement::List { name, item, values } => {
                xml.push_str(&format!("<ldb:{}>", name));
                for value in values {
                    xml.push_str(&format!("<ldb:{}>{}</ldb:{}>", item, escape(value.as_str()), item));
                }
                xml.push_str(&format!("</ldb:{}>", name));
            }
        }
    }
}

/// A Darwin request ready to be serialized.
#[derive(Debug, Clone)]
pub struct SoapRequest {
    pub operation: OperationId,
    token: String,
    pub elements: Vec<RequestElement>,
}

impl SoapRequest {
    /// Builds the request for `operation`. The parameters must belong to the
    /// operation's family.
    pub fn build(
        token: &str,
        operation: OperationId,
        params: &RequestParams,
    ) -> Result<Self, DarwinError> {
        if params.kind() != operation.kind() {
            return Err(DarwinError::InvalidRequest(format!(
                "{:?} parameters cannot be sent as {}",
                params.kind(),
                operation
            )));
        }

        let elements = match params {
            RequestParams::Board(options) => board_elements(options),
            RequestParams::ServiceDetails(options) => service_elements(options),
            RequestParams::NextDepartures(options) => next_departures_elements(options),
        };

        Ok(Self {
            operation,
            token: token.to_string(),
            elements,
        })
    }

    pub fn to_xml(&self) -> String {
        let request_element = self.operation.spec().request_element;
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        xml.push_str(&format!(
            r#"<soap:Envelope xmlns:soap="{}" xmlns:typ="{}" xmlns:ldb="{}">"#,
            SOAP_NS, TOKEN_TYPES_NS, LDB_NS
        ));

        xml.push_str("<soap:Header><typ:AccessToken>");
        xml.push_str(&format!("<typ:TokenValue>{}</typ:TokenValue>", escape(self.token.as_str())));
        xml.push_str("</typ:AccessToken></soap:Header>");

        xml.push_str("<soap:Body>");
        xml.push_str(&format!("<ldb:{}>", request_element));
        for element in &self.elements {
            element.write_to(&mut xml);
        }
        xml.push_str(&format!("</ldb:{}>", request_element));
        xml.push_str("</soap:Body>");

        xml.push_str("</soap:Envelope>");
        xml
    }
}

fn board_elements(options: &BoardOptions) -> Vec<RequestElement> {
    let mut elements = Vec::new();
    if let Some(num_rows) = options.num_rows {
        elements.push(RequestElement::value("numRows", num_rows));
    }
    elements.push(RequestElement::value("crs", &options.crs));
    if let Some(filter_crs) = &options.filter_crs {
        elements.push(RequestElement::value("filterCrs", filter_crs));
    }
    if let Some(filter_type) = options.filter_type {
        elements.push(RequestElement::value("filterType", filter_type.as_str()));
    }
    push_time_window(&mut elements, options.time_offset, options.time_window);
    elements
}

fn service_elements(options: &ServiceDetailsOptions) -> Vec<RequestElement> {
    vec![RequestElement::value("serviceID", &options.service_id)]
}

fn next_departures_elements(options: &NextDeparturesOptions) -> Vec<RequestElement> {
    let mut elements = vec![
        RequestElement::value("crs", &options.crs),
        RequestElement::List {
            name: "filterList",
            item: "crs",
            values: options.destinations.iter().map(ToString::to_string).collect(),
        },
    ];
    push_time_window(&mut elements, options.time_offset, options.time_window);
    elements
}

fn push_time_window(elements: &mut Vec<RequestElement>, offset: Option<i16>, window: Option<u16>) {
    if let Some(offset) = offset {
        elements.push(RequestElement::value("timeOffset", offset));
    }
    if let Some(window) = window {
        elements.push(RequestElement::value("timeWindow", window));
    }
}
