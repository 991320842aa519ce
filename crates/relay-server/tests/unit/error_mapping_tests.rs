//! HTTP status mapping tests

use relay_domain::error::Error;
use relay_server::handlers::{api_error, status_for};
use rocket::http::Status;
use std::time::Duration;

#[test]
fn test_caller_errors_map_to_client_statuses() {
    assert_eq!(
        status_for(&Error::invalid_conversation("Invalid messages format")),
        Status::BadRequest
    );
    assert_eq!(status_for(&Error::invalid_argument("x")), Status::BadRequest);
    assert_eq!(status_for(&Error::unknown_session("s")), Status::BadRequest);
    assert_eq!(status_for(&Error::tool_not_found("t")), Status::NotFound);
    assert_eq!(
        status_for(&Error::schema_validation("t", "a", "is required")),
        Status::UnprocessableEntity
    );
}

#[test]
fn test_relay_failures_map_to_server_statuses() {
    assert_eq!(
        status_for(&Error::timeout("tool", Duration::from_secs(1))),
        Status::GatewayTimeout
    );
    assert_eq!(status_for(&Error::connection("down")), Status::ServiceUnavailable);
    assert_eq!(status_for(&Error::cancelled("bye")), Status::ServiceUnavailable);
    assert_eq!(status_for(&Error::upstream("bad")), Status::InternalServerError);
    assert_eq!(
        status_for(&Error::tool_execution("t", "boom")),
        Status::InternalServerError
    );
}

#[test]
fn test_api_error_body_is_the_message() {
    let (status, body) = api_error(&Error::invalid_conversation("Invalid messages format"));

    assert_eq!(status, Status::BadRequest);
    assert_eq!(body.into_inner().error, "Invalid messages format");
}
