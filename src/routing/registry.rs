//! Route registry
//!
//! Exact-match, case-insensitive mapping from normalized path to handler.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::http::Request;

pub type HandlerResult = Result<String, HandlerError>;

/// Application logic bound to a route
///
/// Returns the response body (conventionally JSON) or fails. Any closure
/// `Fn(&Request) -> HandlerResult` is a handler.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: &Request) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, req: &Request) -> HandlerResult {
        self(req)
    }
}

/// Canonical route key: trimmed, leading `/`, lowercase
///
/// # Examples
/// ```
/// use rust_microserver::routing::normalize;
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("Foo"), "/foo");
/// assert_eq!(normalize("  HELLO  "), "/hello");
/// ```
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_lowercase()
    } else {
        format!("/{}", trimmed.to_lowercase())
    }
}

#[derive(Default, Clone)]
pub struct RouteRegistry {
    routes: HashMap<String, Arc<dyn Handler>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a closure to `path`, replacing any earlier binding
    pub fn register<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(path, handler);
    }

    /// Bind any `Handler` implementation to `path`, replacing any earlier binding
    pub fn register_handler(&mut self, path: &str, handler: impl Handler) {
        self.routes.insert(normalize(path), Arc::new(handler));
    }

    pub fn lookup(&self, path: &str) -> Option<Arc<dyn Handler>> {
        self.routes.get(&normalize(path)).cloned()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered route keys, sorted
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl std::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("routes", &self.paths())
            .finish()
    }
}
