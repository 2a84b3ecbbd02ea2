//! MIME type detection module
//!
//! A fixed extension table consulted for every static file.

use std::path::Path;

/// Fallback for extensions missing from the table
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Lowercase extension to Content-Type; text types carry a charset
const MIME_TABLE: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "application/javascript; charset=utf-8"),
    ("mjs", "application/javascript; charset=utf-8"),
    ("json", "application/json; charset=utf-8"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/plain; charset=utf-8"),
    ("xml", "application/xml"),
    ("svg", "image/svg+xml; charset=utf-8"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("wasm", "application/wasm"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
];

/// Content-Type for a lowercase extension
///
/// # Examples
/// ```
/// use rust_microserver::http::mime::lookup;
/// assert_eq!(lookup("html"), "text/html; charset=utf-8");
/// assert_eq!(lookup("exe"), "application/octet-stream");
/// ```
pub fn lookup(extension: &str) -> &'static str {
    MIME_TABLE
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map_or(OCTET_STREAM, |&(_, content_type)| content_type)
}

/// Infer Content-Type from a file path, ignoring extension case
pub fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(OCTET_STREAM, |e| lookup(&e.to_ascii_lowercase()))
}
