//! HTTP Transport for the tool server
//!
//! Serves the tool protocol over Server-Sent Events.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /sse` | Opens a session; first event is `endpoint`, then `message` frames |
//! | `POST /messages?sessionId=..` | Delivers one JSON-RPC message to a session |
//!
//! # Example
//!
//! ```text
//! GET /sse HTTP/1.1
//!
//! event: endpoint
//! data: /messages?sessionId=0b6c...
//!
//! POST /messages?sessionId=0b6c... HTTP/1.1
//! Content-Type: application/json
//!
//! {"jsonrpc": "2.0", "method": "tools/list", "id": 1}
//! ```

use std::sync::Arc;

use relay_domain::error::Error;
use rocket::data::{Data, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::stream::{Event, EventStream};
use rocket::{FromForm, Request, Response, State, get, options, post};
use tracing::{debug, warn};

use crate::constants::{ACCEPTED_BODY, ENDPOINT_EVENT, MAX_MESSAGE_BYTES, MESSAGE_EVENT};
use crate::tool_server::ToolServer;

/// Shared state for the SSE transport routes
#[derive(Clone)]
pub struct TransportState {
    /// Tool server answering the sessions
    pub server: Arc<ToolServer>,
}

/// Query of `POST /messages`
#[derive(Debug, FromForm)]
pub struct SessionQuery {
    /// Session the message is addressed to
    #[field(name = "sessionId")]
    pub session_id: Option<String>,
}

/// Open a session and stream its frames
#[get("/sse")]
pub fn handle_sse(state: &State<TransportState>) -> EventStream![] {
    let mut connection = state.server.accept_connection();

    EventStream! {
        yield Event::data(connection.endpoint()).event(ENDPOINT_EVENT);

        while let Some(frame) = connection.next_frame().await {
            match serde_json::to_string(&frame) {
                Ok(data) => yield Event::data(data).event(MESSAGE_EVENT),
                Err(e) => warn!(error = %e, "Failed to serialize frame"),
            }
        }

        debug!(session_id = %connection.session_id(), "SSE stream finished");
    }
}

/// Deliver a call message to its session
///
/// Answers `202 Accepted` once the message is queued; the reply travels on
/// the session's event stream.
#[post("/messages?<query..>", data = "<body>")]
pub async fn handle_message(
    state: &State<TransportState>,
    query: SessionQuery,
    body: Data<'_>,
) -> (Status, String) {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return (Status::BadRequest, "Missing sessionId parameter".to_string());
    };
    if !state.server.sessions().contains(&session_id) {
        debug!(session_id = %session_id, "Message for unknown session");
        return (
            Status::BadRequest,
            Error::unknown_session(session_id).to_string(),
        );
    }

    let payload = match body.open(MAX_MESSAGE_BYTES.bytes()).into_string().await {
        Ok(payload) if payload.is_complete() => payload.into_inner(),
        Ok(_) => {
            return (
                Status::PayloadTooLarge,
                "Message body too large".to_string(),
            );
        }
        Err(e) => {
            return (
                Status::BadRequest,
                format!("Failed to read message body: {e}"),
            );
        }
    };

    match state.server.accept_call_message(&session_id, &payload).await {
        Ok(()) => (Status::Accepted, ACCEPTED_BODY.to_string()),
        Err(err) => {
            debug!(session_id = %session_id, error = %err, "Message rejected");
            (Status::BadRequest, err.to_string())
        }
    }
}

/// Answer CORS preflight requests
#[options("/<_..>")]
pub fn preflight() -> Status {
    Status::NoContent
}

/// CORS Fairing for Rocket
///
/// Allows the configured browser origin to call every route.
pub struct Cors {
    origin: String,
}

impl Cors {
    /// Allow the given origin
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS Headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new(
            "Access-Control-Allow-Origin",
            self.origin.clone(),
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ));
        response.set_header(Header::new("Vary", "Origin"));
    }
}
