//! Error taxonomy for request handling
//!
//! Every failure that can happen while serving a connection maps to exactly
//! one HTTP status. Errors never escape the connection boundary: the
//! dispatcher turns them into a well-formed response and closes.

use std::io;
use std::path::PathBuf;

use hyper::StatusCode;
use thiserror::Error;

use crate::http::Response;

/// Error returned by an application route handler
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Request target is not a valid URI
    #[error("malformed request target: {0}")]
    MalformedRequestTarget(String),

    /// Application handler returned an error or panicked
    #[error("{0}")]
    RouteHandlerFailure(String),

    /// Neither a route nor a static file matched
    #[error("not found: {0}")]
    ResourceNotFound(String),

    /// Static file exists but could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ServerError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequestTarget(_) => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            Self::RouteHandlerFailure(_) | Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert into the plain-text response sent to the client
    pub fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::MalformedRequestTarget(_) => "Bad Request".to_string(),
            Self::RouteHandlerFailure(message) => format!("Internal Server Error: {message}"),
            Self::ResourceNotFound(path) => format!("Not Found: {path}"),
            // Filesystem details stay in the error log
            Self::Io { .. } => "Internal Server Error".to_string(),
        };
        Response::text(status, body)
    }
}
