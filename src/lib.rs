//! A minimal HTTP/1.1 server
//!
//! Accepts TCP connections, reads one request line, and answers from either
//! a registered in-process handler or a static file under a configured root.
//! One request is served per connection; the connection is then closed.
//!
//! ```no_run
//! use rust_microserver::config::Config;
//! use rust_microserver::server::HttpServer;
//!
//! # async fn start() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = HttpServer::new(Config::load()?);
//! server
//!     .staticfiles("/static")
//!     .get("/app/pi", |_req| Ok(r#"{"pi":"3.14"}"#.to_string()));
//! server.run().await
//! # }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::{HandlerError, ServerError};
pub use server::HttpServer;
