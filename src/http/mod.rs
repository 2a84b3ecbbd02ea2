//! HTTP protocol layer module
//!
//! Request-line parsing, query decoding, MIME detection and response framing,
//! decoupled from routing and static file lookup.

pub mod mime;
pub mod query;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::{Request, RequestLine};
pub use response::{write_response, Response};
