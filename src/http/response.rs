//! Response descriptor and wire serialization
//!
//! A `Response` carries status, content type and body. `write_response`
//! frames it as HTTP/1.1: status line, `Content-Type`, `Content-Length`,
//! `Connection: close`, blank line, then the raw body bytes.

use std::borrow::Cow;

use hyper::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    content_type: Cow<'static, str>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(
        status: StatusCode,
        content_type: impl Into<Cow<'static, str>>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// 200 with a handler-produced body
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::OK, JSON_CONTENT_TYPE, body)
    }

    /// Plain-text response, used for every error status
    pub fn text(status: StatusCode, text: impl Into<String>) -> Self {
        Self::new(status, TEXT_CONTENT_TYPE, text.into().into_bytes())
    }

    /// 200 with static file contents
    pub fn file(data: Vec<u8>, content_type: &'static str) -> Self {
        Self::new(StatusCode::OK, content_type, data)
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Serialize status line and headers, including the terminating blank line
    ///
    /// Header text is emitted one byte per character (ISO-8859-1); characters
    /// outside that range are replaced with `?`.
    pub fn head_bytes(&self, version: &str) -> Vec<u8> {
        let head = format!(
            "{version} {code} {reason}\r\n\
             Content-Type: {content_type}\r\n\
             Content-Length: {length}\r\n\
             Connection: close\r\n\
             \r\n",
            code = self.status.as_u16(),
            reason = reason_phrase(self.status),
            content_type = self.content_type,
            length = self.body.len(),
        );
        encode_latin1(&head)
    }
}

/// Reason phrase for the status line
pub fn reason_phrase(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "OK",
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::NOT_FOUND => "Not Found",
        other => other.canonical_reason().unwrap_or("Status"),
    }
}

fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Write one complete response and flush
///
/// The body is written verbatim after the header block.
pub async fn write_response<W>(out: &mut W, version: &str, response: &Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(&response.head_bytes(version)).await?;
    out.write_all(&response.body).await?;
    out.flush().await
}
