//! Routing module
//!
//! Maps normalized request paths to application handlers.

pub mod registry;

pub use registry::{normalize, Handler, HandlerResult, RouteRegistry};
