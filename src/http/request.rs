//! Request line parsing and the request view handed to route handlers

use std::collections::HashMap;
use std::sync::OnceLock;

use hyper::Uri;

use crate::error::ServerError;
use crate::http::query::parse_query;

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_TARGET: &str = "/";
pub const DEFAULT_VERSION: &str = "HTTP/1.1";

/// The three tokens of an HTTP request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl RequestLine {
    /// Parse `METHOD SP target SP version`
    ///
    /// Returns `None` for a blank line, including one made only of
    /// whitespace. Missing tokens fall back to `GET`, `/` and `HTTP/1.1`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let mut parts = line.split(' ').filter(|p| !p.is_empty());
        let method = parts.next().unwrap_or(DEFAULT_METHOD);
        let target = parts.next().unwrap_or(DEFAULT_TARGET);
        let version = parts.next().unwrap_or(DEFAULT_VERSION);

        Some(Self {
            method: method.to_string(),
            target: target.to_string(),
            version: version.to_string(),
        })
    }

    /// Version to echo in the status line
    ///
    /// Anything that is not a plain `HTTP/x.y` token is answered as HTTP/1.1.
    pub fn response_version(&self) -> &str {
        let well_formed = self
            .version
            .strip_prefix("HTTP/")
            .and_then(|v| v.split_once('.'))
            .is_some_and(|(major, minor)| {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.bytes().all(|b| b.is_ascii_digit())
                    && minor.bytes().all(|b| b.is_ascii_digit())
            });
        if well_formed {
            &self.version
        } else {
            DEFAULT_VERSION
        }
    }
}

/// Read-only view of one request, passed to route handlers
#[derive(Debug)]
pub struct Request {
    method: String,
    target: String,
    path: String,
    raw_query: Option<String>,
    version: String,
    query: OnceLock<HashMap<String, String>>,
}

impl Request {
    /// Build a request from a parsed request line
    ///
    /// Fails with `MalformedRequestTarget` when the target is not a valid
    /// URI or its path does not percent-decode to UTF-8.
    pub fn from_line(line: &RequestLine) -> Result<Self, ServerError> {
        let malformed = || ServerError::MalformedRequestTarget(line.target.clone());

        let uri: Uri = line.target.parse().map_err(|_| malformed())?;
        let well_formed = is_uri_component(uri.path(), b"/")
            && uri.query().is_none_or(|q| is_uri_component(q, b"/?"));
        if !well_formed {
            return Err(malformed());
        }

        let path = urlencoding::decode(uri.path())
            .map_err(|_| malformed())?
            .into_owned();

        Ok(Self {
            method: line.method.clone(),
            target: line.target.clone(),
            path,
            raw_query: uri.query().map(ToString::to_string),
            version: line.version.clone(),
            query: OnceLock::new(),
        })
    }

    /// Convenience constructor for a `GET` of the given target
    pub fn get(target: &str) -> Result<Self, ServerError> {
        Self::from_line(&RequestLine {
            method: DEFAULT_METHOD.to_string(),
            target: target.to_string(),
            version: DEFAULT_VERSION.to_string(),
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Raw request target as sent by the client
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Percent-decoded path component of the target
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Decoded query parameters, computed on first access
    pub fn query_map(&self) -> &HashMap<String, String> {
        self.query
            .get_or_init(|| self.raw_query.as_deref().map(parse_query).unwrap_or_default())
    }

    /// Value of a query parameter, or the empty string when absent
    pub fn value(&self, name: &str) -> &str {
        self.query_map().get(name).map_or("", String::as_str)
    }
}

/// RFC 3986 `pchar`s plus `extra`, with every `%` starting a two-digit hex escape
fn is_uri_component(text: &str, extra: &[u8]) -> bool {
    let mut bytes = text.bytes();
    while let Some(b) = bytes.next() {
        let allowed = match b {
            b'%' => matches!(
                (bytes.next(), bytes.next()),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            ),
            // unreserved, sub-delims, ':' and '@'
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~'
            | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
            | b':' | b'@' => true,
            other => extra.contains(&other),
        };
        if !allowed {
            return false;
        }
    }
    true
}
