//! Log writer module
//!
//! Routes access and info lines to one sink and warnings/errors to another.
//! Each sink is either a standard stream or an append-only file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::config::LoggingConfig;

static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

enum Sink {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl Sink {
    fn open(path: Option<&str>, console: Self) -> io::Result<Self> {
        match path {
            Some(path) => Ok(Self::File(Mutex::new(append_to(Path::new(path))?))),
            None => Ok(console),
        }
    }

    fn line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
                // Write failures are dropped
                let _ = writeln!(file, "{message}");
            }
        }
    }
}

/// Process-wide destination for log lines
pub struct LogWriter {
    access: Sink,
    error: Sink,
}

impl LogWriter {
    fn open(config: &LoggingConfig) -> io::Result<Self> {
        Ok(Self {
            access: Sink::open(config.access_log_file.as_deref(), Sink::Stdout)?,
            error: Sink::open(config.error_log_file.as_deref(), Sink::Stderr)?,
        })
    }

    pub fn write_access(&self, message: &str) {
        self.access.line(message);
    }

    pub fn write_error(&self, message: &str) {
        self.error.line(message);
    }
}

/// Open `path` for appending, creating it and its parent directories
fn append_to(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global writer; fails if a log file cannot be opened or a
/// writer is already installed
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let writer = LogWriter::open(config)?;
    LOG_WRITER
        .set(writer)
        .map_err(|_| io::Error::new(io::ErrorKind::AlreadyExists, "log writer already installed"))
}

pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sinks_append_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let access = dir.path().join("logs/access.log");
        let error = dir.path().join("logs/nested/error.log");
        let config = LoggingConfig {
            access_log_file: Some(access.display().to_string()),
            error_log_file: Some(error.display().to_string()),
            ..LoggingConfig::default()
        };

        let writer = LogWriter::open(&config).unwrap();
        writer.write_access("GET / 200");
        writer.write_access("GET /app/pi 200");
        writer.write_error("disk on fire");

        assert_eq!(
            std::fs::read_to_string(&access).unwrap(),
            "GET / 200\nGET /app/pi 200\n"
        );
        assert_eq!(std::fs::read_to_string(&error).unwrap(), "disk on fire\n");
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let config = LoggingConfig {
            access_log_file: Some(blocker.join("access.log").display().to_string()),
            ..LoggingConfig::default()
        };
        assert!(LogWriter::open(&config).is_err());
    }
}
