use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::darwin::{DarwinError, InvalidCrs};

/// A failed gateway request, rendered as a JSON error body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Darwin(DarwinError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            code: None,
        }
    }
}

impl From<DarwinError> for ApiError {
    fn from(err: DarwinError) -> Self {
        ApiError::Darwin(err)
    }
}

impl From<InvalidCrs> for ApiError {
    fn from(_: InvalidCrs) -> Self {
        ApiError::BadRequest("invalid 'crs'".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorBody::new(message)),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, ErrorBody::new(message)),
            ApiError::Darwin(err) => darwin_error_response(err),
        };

        (status, Json(body)).into_response()
    }
}

fn darwin_error_response(err: DarwinError) -> (StatusCode, ErrorBody) {
    let fault = err.fault();

    match err {
        DarwinError::Upstream {
            status,
            status_text,
            ..
        } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            match fault {
                Some(fault) if fault.is_service_not_found() => (
                    StatusCode::NOT_FOUND,
                    ErrorBody {
                        error: "Service not found".to_string(),
                        message: Some(fault.reason),
                        code: fault.code,
                    },
                ),
                Some(fault) => (
                    status,
                    ErrorBody {
                        error: fault.reason,
                        message: None,
                        code: fault.code,
                    },
                ),
                None => (status, ErrorBody::new(status_text)),
            }
        }
        DarwinError::Http(e) => {
            tracing::error!("Darwin request failed: {}", e);
            (StatusCode::BAD_GATEWAY, ErrorBody::new("Darwin API unavailable"))
        }
        err @ (DarwinError::Normalize(_) | DarwinError::InvalidRequest(_)) => {
            tracing::error!("{}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(err.to_string()))
        }
    }
}
