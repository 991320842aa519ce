//! HTTP error responses
//!
//! Domain errors leave the HTTP surface as `(Status, Json<ErrorResponse>)`
//! with an `{"error": "..."}` body.

use relay_domain::error::Error;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Request, catch};
use serde::Serialize;
use tracing::{error, warn};

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Create an error body
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Error half of every JSON handler result
pub type ApiError = (Status, Json<ErrorResponse>);

/// HTTP status for a domain error
pub fn status_for(err: &Error) -> Status {
    match err {
        Error::InvalidConversation { .. }
        | Error::InvalidArgument { .. }
        | Error::UnknownSession { .. } => Status::BadRequest,
        Error::ToolNotFound { .. } => Status::NotFound,
        Error::SchemaValidation { .. } => Status::UnprocessableEntity,
        Error::Timeout { .. } => Status::GatewayTimeout,
        Error::Connection { .. } | Error::Cancelled { .. } => Status::ServiceUnavailable,
        _ => Status::InternalServerError,
    }
}

/// Convert a domain error into a response, logging server-side failures
pub fn api_error(err: &Error) -> ApiError {
    let status = status_for(err);
    if status.code >= 500 {
        error!(status = status.code, kind = err.kind(), error = %err, "Request failed");
    } else {
        warn!(status = status.code, kind = err.kind(), error = %err, "Request rejected");
    }
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// JSON body for errors raised by Rocket itself
#[catch(default)]
pub fn default_catcher(status: Status, _request: &Request<'_>) -> ApiError {
    (
        status,
        Json(ErrorResponse::new(status.reason().unwrap_or("Unknown error"))),
    )
}
