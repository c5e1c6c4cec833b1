use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::error::DarwinError;
use super::soap::SOAP_CONTENT_TYPE;
use crate::config::DarwinConfig;

/// HTTP transport to the Darwin endpoint.
#[derive(Clone)]
pub struct DarwinClient {
    endpoint: String,
    http_client: Client,
}

impl DarwinClient {
    pub fn new(config: &DarwinConfig) -> Result<Self, DarwinError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http_client,
        })
    }

    /// Posts a SOAP envelope and returns the response body.
    ///
    /// A non-success status becomes [`DarwinError::Upstream`] carrying the body,
    /// which usually holds a SOAP fault.
    pub async fn send_soap_request(&self, soap_request: String) -> Result<String, DarwinError> {
        tracing::trace!("Sending SOAP request to {}: {}", self.endpoint, soap_request);

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .body(soap_request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Darwin returned error status {}: {}", status, response_text);
            return Err(DarwinError::Upstream {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body: response_text,
            });
        }

        tracing::trace!("Received SOAP response from Darwin: {}", response_text);

        Ok(response_text)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, block_on};

    fn config(endpoint: &str) -> DarwinConfig {
        DarwinConfig {
            endpoint: endpoint.to_string(),
            token: String::new(),
            timeout_secs: 2,
        }
    }

    #[test]
    fn test_unreachable_endpoint_is_http_error() {
        let client = DarwinClient::new(&config("http://127.0.0.1:1/OpenLDBWS/ldb11.asmx")).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:1/OpenLDBWS/ldb11.asmx");

        let err = assert_err!(block_on(client.send_soap_request("<x/>".to_string())));
        assert!(matches!(err, DarwinError::Http(_)));
    }
}
