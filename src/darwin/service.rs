use uuid::Uuid;

use super::client::DarwinClient;
use super::error::DarwinError;
use super::operation::OperationId;
use super::soap::SoapRequest;
use super::types::RequestParams;
use crate::translator::{normalize, NormalizedDocument};

/// Runs one Darwin operation end to end: build, send, normalize.
#[derive(Clone)]
pub struct RailService {
    client: DarwinClient,
}

impl RailService {
    pub fn new(client: DarwinClient) -> Self {
        Self { client }
    }

    pub async fn fetch(
        &self,
        token: &str,
        operation: OperationId,
        params: &RequestParams,
    ) -> Result<NormalizedDocument, DarwinError> {
        let request_id = Uuid::new_v4();
        let request = SoapRequest::build(token, operation, params)?;

        tracing::info!("[{}] {} -> {}", request_id, operation, self.client.endpoint());

        let response = self.client.send_soap_request(request.to_xml()).await.map_err(|e| {
            tracing::warn!("[{}] {} failed: {}", request_id, operation, e);
            e
        })?;

        let document = normalize(&response, operation).map_err(|e| {
            tracing::error!("[{}] {} returned an unusable response: {}", request_id, operation, e);
            e
        })?;

        tracing::debug!("[{}] {} normalized", request_id, operation);

        Ok(document)
    }
}
