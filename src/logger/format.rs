//! Access log formatting
//!
//! Named formats:
//! - `combined`: CLF followed by `"-" "-"` (headers are not retained)
//! - `common`: Common Log Format
//! - `json`: one JSON object per line
//!
//! Any other value is a pattern with `$variable` substitution.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde_json::json;

use crate::http::{RequestLine, Response};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served connection, as recorded in the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// `ip:port`, or `-` when the peer is unknown
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Target without its query
    pub path: String,
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Record the outcome of `line`, stamped with the current time
    pub fn record(
        peer: Option<SocketAddr>,
        line: &RequestLine,
        response: &Response,
        elapsed: Duration,
    ) -> Self {
        let (path, query) = match line.target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (line.target.clone(), None),
        };
        Self {
            remote_addr: peer.map_or_else(|| "-".to_string(), |a| a.to_string()),
            time: Local::now(),
            method: line.method.clone(),
            path,
            query,
            http_version: line.version.clone(),
            status: response.status().as_u16(),
            body_bytes: response.body().len(),
            request_time_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        }
    }

    /// Render in the named format, or as a `$variable` pattern
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!("{} \"-\" \"-\"", self.clf()),
            "common" => self.clf(),
            "json" => self.json(),
            pattern => self.substitute(pattern),
        }
    }

    fn uri(&self) -> String {
        self.query
            .as_ref()
            .map_or_else(|| self.path.clone(), |q| format!("{}?{q}", self.path))
    }

    fn request(&self) -> String {
        format!("{} {} {}", self.method, self.uri(), self.http_version)
    }

    fn clf(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request(),
            self.status,
            self.body_bytes,
        )
    }

    fn json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`
    /// (seconds, 3 decimals), `$status`, `$body_bytes_sent`.
    ///
    /// The pattern is scanned once; substituted values are never expanded
    /// again. An unknown `$name` is copied through.
    fn substitute(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.request_time_us as f64 / 1_000_000.0;

        // Longer `$request_*` names go first so `$request` cannot eat their prefix
        let vars = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{seconds:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.uri()),
            ("$request", self.request()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
        ];

        let mut out = String::with_capacity(pattern.len());
        let mut rest = pattern;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            match vars.iter().find(|(name, _)| tail.starts_with(name)) {
                Some((name, value)) => {
                    out.push_str(value);
                    rest = &tail[name.len()..];
                }
                None => {
                    out.push('$');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
