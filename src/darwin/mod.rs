//! Darwin LDB web service: operation table, request envelopes, transport
//! and fault handling.

pub mod client;
pub mod error;
pub mod fault;
pub mod operation;
pub mod service;
pub mod soap;
pub mod types;

pub use client::DarwinClient;
pub use error::DarwinError;
pub use fault::SoapFault;
pub use operation::{OperationId, OperationKind, OperationSpec};
pub use service::RailService;
pub use soap::SoapRequest;
pub use types::{
    BoardOptions, Crs, FilterType, InvalidCrs, NextDeparturesOptions, RequestParams,
    ServiceDetailsOptions,
};
