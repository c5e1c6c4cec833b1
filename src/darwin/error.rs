use crate::translator::NormalizeError;

use super::fault::SoapFault;

/// Errors from talking to Darwin and shaping its answers.
#[derive(Debug, thiserror::Error)]
pub enum DarwinError {
    /// Network error, timeout, or an unreadable response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Darwin answered with a non-success status. The body is usually a SOAP fault.
    #[error("Darwin API failure: {status} {status_text}")]
    Upstream {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl DarwinError {
    /// The SOAP fault carried by an upstream failure, if its body holds one.
    pub fn fault(&self) -> Option<SoapFault> {
        match self {
            DarwinError::Upstream { body, .. } => SoapFault::parse(body),
            _ => None,
        }
    }
}
