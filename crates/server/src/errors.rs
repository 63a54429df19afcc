use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::{ApiResponse, ApiStatus};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Sole `errors` entry for faults that must not leak detail.
pub const GENERIC_FAULT_DETAIL: &str = "An unexpected error occurred. Please try again later.";

/// Uncaught fault categories and their fixed HTTP mapping.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("{0}")]
    NotImplemented(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Other(String),
}

impl Fault {
    pub fn status(&self) -> StatusCode {
        match self {
            Fault::InvalidArgument(_) | Fault::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Fault::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Fault::NotFound(_) => StatusCode::NOT_FOUND,
            Fault::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Fault::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Fault::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Fault::InvalidArgument(_) => "Invalid argument",
            Fault::Unauthorized(_) => "Unauthorized",
            Fault::NotFound(_) => "Resource not found",
            Fault::InvalidOperation(_) => "Invalid operation",
            Fault::NotImplemented(_) => "Feature not implemented",
            Fault::Timeout(_) => "Request timeout",
            Fault::Other(_) => "Internal server error",
        }
    }

    /// What the client gets to see in `errors`.
    pub fn detail(&self) -> String {
        match self {
            Fault::Other(_) => GENERIC_FAULT_DETAIL.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), fault = %self, "unhandled fault");
        } else {
            warn!(status = status.as_u16(), fault = %self, "request fault");
        }
        let body = ApiStatus::failure(self.title(), Some(vec![self.detail()]));
        (status, Json(body)).into_response()
    }
}

/// Errors a handler can return; every variant renders as an envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: String, errors: Vec<String> },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// `context` is the client-facing message; `source` is only logged.
    #[error("{context}")]
    Unexpected {
        context: String,
        #[source]
        source: ServiceError,
    },
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { message, errors } => {
                let body = ApiResponse::<()>::failure(message, Some(errors));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ApiResponse::<()>::failure(message, None))).into_response()
            }
            ApiError::Conflict(message) => {
                (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::failure(message, None))).into_response()
            }
            ApiError::Unexpected { context, source } => {
                error!(error = %source, %context, "handler failed");
                let body = ApiResponse::<()>::failure(context, None);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::Fault(fault) => fault.into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Fault::InvalidArgument(rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Fault::InvalidArgument(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Fault::InvalidArgument(rejection.body_text()).into()
    }
}
