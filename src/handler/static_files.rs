//! Static file serving module
//!
//! Resolves request paths to files under the serving directory, with the
//! development source tree as a fallback, and infers their content type.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::ServerError;
use crate::http::mime;
use crate::logger;

pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// A static file loaded fully into memory
#[derive(Debug)]
pub struct StaticFile {
    pub path: PathBuf,
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

/// Lookup roots for static content
#[derive(Debug, Clone)]
pub struct StaticResolver {
    serve_dir: PathBuf,
    fallback_dir: Option<PathBuf>,
    index_file: String,
}

impl StaticResolver {
    pub fn new(serve_dir: impl Into<PathBuf>) -> Self {
        Self {
            serve_dir: serve_dir.into(),
            fallback_dir: None,
            index_file: DEFAULT_INDEX_FILE.to_string(),
        }
    }

    /// Secondary root tried when the serving directory lacks a file
    #[must_use]
    pub fn with_fallback(mut self, fallback_dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = Some(fallback_dir.into());
        self
    }

    /// File served for `/`
    #[must_use]
    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    pub fn serve_dir(&self) -> &Path {
        &self.serve_dir
    }

    pub fn fallback_dir(&self) -> Option<&Path> {
        self.fallback_dir.as_deref()
    }

    /// Map a request path to `/`-rooted form, with `/` replaced by the index file
    pub fn clean_path(&self, request_path: &str) -> String {
        let clean = sanitize_path(request_path);
        if clean == "/" {
            format!("/{}", self.index_file.trim_start_matches('/'))
        } else {
            clean
        }
    }

    /// Locate and read the file for `request_path`
    ///
    /// Directories and missing files are `ResourceNotFound`; a read failure on
    /// an existing file is `Io`.
    pub async fn resolve(&self, request_path: &str) -> Result<StaticFile, ServerError> {
        let clean = self.clean_path(request_path);
        let relative = clean.trim_start_matches('/');

        let roots = std::iter::once(self.serve_dir.as_path()).chain(self.fallback_dir.as_deref());
        for root in roots {
            let candidate = root.join(relative);
            let is_file = fs::metadata(&candidate)
                .await
                .is_ok_and(|meta| meta.is_file());
            if !is_file {
                continue;
            }

            if !is_within(root, &candidate).await {
                logger::log_warning(&format!(
                    "Path traversal attempt blocked: {request_path} -> {}",
                    candidate.display()
                ));
                continue;
            }

            let data = fs::read(&candidate).await.map_err(|source| ServerError::Io {
                path: candidate.clone(),
                source,
            })?;
            let content_type = mime::content_type_for(&candidate);
            return Ok(StaticFile {
                path: candidate,
                data,
                content_type,
            });
        }

        Err(ServerError::ResourceNotFound(clean))
    }
}

/// Canonicalize separators and resolve `.` / `..` segments
///
/// Backslashes become `/`, repeated separators collapse, and `..` removes
/// the previous segment but never climbs above the root.
///
/// # Examples
/// ```
/// use rust_microserver::handler::static_files::sanitize_path;
/// assert_eq!(sanitize_path("/a/../b"), "/b");
/// assert_eq!(sanitize_path("/../secret"), "/secret");
/// assert_eq!(sanitize_path("\\css//site.css"), "/css/site.css");
/// ```
pub fn sanitize_path(request_path: &str) -> String {
    let unified = request_path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Symlink guard: the canonical candidate must stay under the canonical root
async fn is_within(root: &Path, candidate: &Path) -> bool {
    match (fs::canonicalize(root).await, fs::canonicalize(candidate).await) {
        (Ok(root), Ok(file)) => file.starts_with(root),
        _ => false,
    }
}
