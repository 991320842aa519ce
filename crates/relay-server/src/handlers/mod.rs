//! HTTP handlers outside the tool transport
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | `/chat` | POST | Conversation through the model bridge |
//! | `/upload-pdf` | POST | Stamp text onto an uploaded PDF |
//! | `/health` | GET | Liveness and session counts |

pub mod chat;
pub mod error;
pub mod health;
pub mod upload;

pub use chat::ChatState;
pub use error::{ApiError, ErrorResponse, api_error, status_for};
pub use health::HealthState;
pub use upload::UploadState;
