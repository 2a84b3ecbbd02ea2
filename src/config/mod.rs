// Configuration module entry point
// Loads layered configuration and holds the shared serving state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, ServerConfig, StaticFilesConfig};

/// Config file looked up when none is given
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from "config.toml" (optional) plus environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (extension optional)
    ///
    /// Environment variables prefixed with `SERVER__` override file values,
    /// e.g. `SERVER__SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("static_files.serve_root", "target/site")?
            .set_default("static_files.source_root", "resources")?
            .set_default("static_files.folder", "/static")?
            .set_default("static_files.index_file", "index.html")?
            .set_default("static_files.copy_on_start", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does/not/exist/config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.static_files.folder, "/static");
        assert_eq!(cfg.static_files.index_file, "index.html");
        assert!(cfg.static_files.copy_on_start);
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 35000
workers = 2

[static_files]
serve_root = "public"
source_root = "assets"
folder = "webroot"
copy_on_start = false

[logging]
level = "debug"
access_log = false
"#
        )
        .unwrap();

        let cfg = Config::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 35000);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.static_files.serve_root, "public");
        assert_eq!(cfg.static_files.folder, "webroot");
        assert!(!cfg.static_files.copy_on_start);
        assert_eq!(cfg.logging.level, "debug");
        assert!(!cfg.logging.access_log);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("does/not/exist/config").unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
