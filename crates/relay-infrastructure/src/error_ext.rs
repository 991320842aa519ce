//! Error extension utilities
//!
//! Attach a message to a foreign error while converting it into the domain
//! [`Error`] variant that matches where it happened.

use relay_domain::error::{BoxError, Error, Result};
use std::fmt;

/// Context conversions for foreign results
///
/// # Example
///
/// ```ignore
/// use relay_infrastructure::error_ext::ErrorContext;
///
/// std::fs::write(&path, contents).io_context("Failed to write config file")?;
/// ```
pub trait ErrorContext<T> {
    /// Reading or writing local files
    fn io_context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Loading or serializing configuration
    fn config_context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Reaching a remote service
    fn connection_context<C: fmt::Display>(self, context: C) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn io_context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| {
            let (message, source) = annotate(&context, err);
            Error::Io { message, source }
        })
    }

    fn config_context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| {
            let (message, source) = annotate(&context, err);
            Error::Configuration { message, source }
        })
    }

    fn connection_context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| {
            let (message, source) = annotate(&context, err);
            Error::Connection { message, source }
        })
    }
}

fn annotate<C, E>(context: &C, err: E) -> (String, Option<BoxError>)
where
    C: fmt::Display,
    E: std::error::Error + Send + Sync + 'static,
{
    (format!("{context}: {err}"), Some(Box::new(err)))
}
