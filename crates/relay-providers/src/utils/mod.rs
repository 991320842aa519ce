//! Shared provider utilities

/// HTTP response status handling
pub mod http_response;

pub use http_response::HttpResponseUtils;
