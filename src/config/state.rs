// Application state module
// Read-only state shared by every connection once serving starts

use crate::config::LoggingConfig;
use crate::handler::StaticResolver;
use crate::routing::RouteRegistry;

/// Application state
///
/// Built once before the accept loop and shared behind an `Arc`; nothing in
/// it changes while requests are being served, so no locking is needed.
#[derive(Debug)]
pub struct AppState {
    pub routes: RouteRegistry,
    pub statics: StaticResolver,
    pub access_log: bool,
    pub access_log_format: String,
}

impl AppState {
    pub fn new(routes: RouteRegistry, statics: StaticResolver) -> Self {
        let logging = LoggingConfig::default();
        Self {
            routes,
            statics,
            access_log: logging.access_log,
            access_log_format: logging.access_log_format,
        }
    }

    /// Apply access log settings
    #[must_use]
    pub fn with_logging(mut self, logging: &LoggingConfig) -> Self {
        self.access_log = logging.access_log;
        self.access_log_format.clone_from(&logging.access_log_format);
        self
    }
}
