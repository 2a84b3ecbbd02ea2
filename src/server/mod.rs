// Server module entry point
// Owns the route registry and static configuration, and runs the accept loop

pub mod connection;
pub mod listener;
pub mod server_loop;
pub mod signal;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::handler::{assets, StaticResolver};
use crate::http::Request;
use crate::logger;
use crate::routing::{HandlerResult, RouteRegistry};

// Re-export commonly used items
pub use connection::serve_connection;
pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// An HTTP server instance
///
/// Routes and the static root are configured through `&mut self` before
/// serving; `serve` consumes the server, so nothing can change once the
/// accept loop is running.
#[derive(Debug)]
pub struct HttpServer {
    config: Config,
    routes: RouteRegistry,
    statics: StaticResolver,
}

impl HttpServer {
    /// Create a server whose static root comes from `config.static_files`
    ///
    /// No files are copied until `staticfiles` is called.
    pub fn new(config: Config) -> Self {
        let statics = resolver_for(&config, &config.static_files.folder);
        Self {
            config,
            routes: RouteRegistry::new(),
            statics,
        }
    }

    /// Register a `GET` handler; re-registering a path replaces the handler
    pub fn get<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.routes.register(path, handler);
        self
    }

    /// Serve static files from `folder` under the configured roots
    ///
    /// With `copy_on_start` enabled the development tree
    /// (`source_root + folder`) is copied into the serving tree
    /// (`serve_root + folder`). Copy failures are logged, not returned.
    pub fn staticfiles(&mut self, folder: &str) -> &mut Self {
        let folder = normalize_folder(folder);
        self.config.static_files.folder.clone_from(&folder);
        self.statics = resolver_for(&self.config, &folder);

        if self.config.static_files.copy_on_start {
            if let Some(from) = self.statics.fallback_dir() {
                let to = self.statics.serve_dir();
                logger::log_static_copy(from, to);
                match assets::copy_tree(from, to) {
                    Ok(count) => logger::log_info(&format!("[staticfiles] Copied {count} file(s)")),
                    Err(e) => logger::log_warning(&format!(
                        "[staticfiles] Could not copy static files: {e}"
                    )),
                }
            }
        }
        self
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn routes(&self) -> &RouteRegistry {
        &self.routes
    }

    pub const fn statics(&self) -> &StaticResolver {
        &self.statics
    }

    /// Freeze routes and static configuration into the shared state
    pub fn into_state(self) -> AppState {
        AppState::new(self.routes, self.statics).with_logging(&self.config.logging)
    }

    /// Bind the configured host and port
    pub fn bind(&self) -> Result<TcpListener, Box<dyn std::error::Error>> {
        let addr = self.config.get_socket_addr()?;
        Ok(create_listener(addr)?)
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        let state = Arc::new(self.into_state());
        start_server_loop(listener, state, shutdown).await
    }

    /// Bind and serve until SIGINT/SIGTERM
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = self.bind()?;
        logger::log_server_start(&listener.local_addr()?, &self.config);
        self.serve(listener, signal::shutdown_signal()).await?;
        Ok(())
    }
}

/// Ensure a leading `/`; an empty folder means the root itself
fn normalize_folder(folder: &str) -> String {
    let folder = folder.trim();
    if folder.starts_with('/') {
        folder.to_string()
    } else {
        format!("/{folder}")
    }
}

fn under(root: &str, folder: &str) -> PathBuf {
    Path::new(root).join(folder.trim_start_matches('/'))
}

fn resolver_for(config: &Config, folder: &str) -> StaticResolver {
    let cfg = &config.static_files;
    StaticResolver::new(under(&cfg.serve_root, folder))
        .with_fallback(under(&cfg.source_root, folder))
        .with_index_file(cfg.index_file.clone())
}
