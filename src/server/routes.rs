use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::config::AppConfig;
use crate::darwin::{OperationId, RailService, RequestParams, ServiceDetailsOptions};
use crate::translator::NormalizedDocument;

use super::error::ApiError;
use super::params::{board_options, next_departures_options, QueryParams};

#[derive(Clone)]
pub struct AppState {
    pub rail_service: RailService,
    pub token_header: String,
    pub default_token: String,
    pub started_at: DateTime<Utc>,
    pub started: Instant,
}

impl AppState {
    pub fn new(rail_service: RailService, config: &AppConfig) -> Self {
        Self {
            rail_service,
            token_header: config.server.token_header.clone(),
            default_token: config.darwin.token.clone(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// The caller's token header wins over the configured fallback token.
    fn resolve_token(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        let from_header = headers
            .get(self.token_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty());

        match from_header {
            Some(token) => Ok(token.to_string()),
            None if !self.default_token.is_empty() => Ok(self.default_token.clone()),
            None => Err(ApiError::Unauthorized(format!(
                "The '{}' header does not contain an API token",
                self.token_header
            ))),
        }
    }

    async fn fetch(
        &self,
        headers: &HeaderMap,
        operation: OperationId,
        params: RequestParams,
    ) -> Result<Json<NormalizedDocument>, ApiError> {
        let token = self.resolve_token(headers)?;
        let document = self.rail_service.fetch(&token, operation, &params).await?;
        Ok(Json(document))
    }
}

type ApiResult = Result<Json<NormalizedDocument>, ApiError>;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Station boards
        .route("/arrivals/:crs", get(arrivals))
        .route("/arrivals/:crs/detailed", get(detailed_arrivals))
        .route("/departures/:crs", get(departures))
        .route("/departures/:crs/detailed", get(detailed_departures))
        .route("/all/:crs", get(arrivals_and_departures))
        .route("/all/:crs/detailed", get(detailed_arrivals_and_departures))
        // Next departures to given destinations
        .route("/departures/:crs/next", get(next_departures))
        .route("/departures/:crs/next/detailed", get(detailed_next_departures))
        // Single service
        .route("/service/:service_id", get(service_details))
        // Health check
        .route("/health", get(health_check))
        .with_state(state)
}

async fn station_board(
    state: &AppState,
    headers: &HeaderMap,
    operation: OperationId,
    crs: &str,
    query: Vec<(String, String)>,
) -> ApiResult {
    let options = board_options(crs, &QueryParams(query))?;
    tracing::info!("{} for {}", operation, options.crs);
    state.fetch(headers, operation, RequestParams::Board(options)).await
}

async fn arrivals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(crs): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult {
    station_board(&state, &headers, OperationId::ArrivalBoard, &crs, query).await
}

async fn detailed_arrivals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(crs): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult {
    station_board(&state, &headers, OperationId::DetailedArrivalBoard, &crs, query).await
}

async fn departures(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(crs): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult {
    station_board(&state, &headers, OperationId::DepartureBoard, &crs, query).await
}

async fn detailed_departures(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(crs): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult {
    station_board(&state, &headers, OperationId::DetailedDepartureBoard, &crs, query).await
}

async fn arrivals_and_departures(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(crs): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult {
    station_board(&state, &headers, OperationId::CombinedBoard, &crs, query).await
}

async fn detailed_arrivals_and_departures(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(crs): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult {
    station_board(&state, &headers, OperationId::DetailedCombinedBoard, &crs, query).await
}

async fn next_departures_board(
    state: &AppState,
    headers: &HeaderMap,
    operation: OperationId,
    crs: &str,
    query: Vec<(String, String)>,
) -> ApiResult {
    let options = next_departures_options(crs, &QueryParams(query))?;
    tracing::info!("{} for {} to {} destinations", operation, options.crs, options.destinations.len());
    state.fetch(headers, operation, RequestParams::NextDepartures(options)).await
}

async fn next_departures(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(crs): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult {
    next_departures_board(&state, &headers, OperationId::NextDepartures, &crs, query).await
}

async fn detailed_next_departures(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(crs): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult {
    next_departures_board(&state, &headers, OperationId::DetailedNextDepartures, &crs, query).await
}

async fn service_details(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(service_id): Path<String>,
) -> ApiResult {
    let service_id = service_id.trim().to_string();
    if service_id.is_empty() {
        return Err(ApiError::BadRequest("No 'serviceId' provided".to_string()));
    }

    tracing::info!("Service details for {}", service_id);
    let params = RequestParams::ServiceDetails(ServiceDetailsOptions { service_id });
    state.fetch(&headers, OperationId::ServiceDetails, params).await
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "uptime": state.started.elapsed().as_secs(),
        "startedAt": state.started_at.to_rfc3339(),
    }))
}
