//! This module provides helpers for writing the response of a CGI program.

use std::io::Write;

use http::{header::CONTENT_TYPE, Response, StatusCode, Version};

use crate::error::Error;

pub type RawResponse = Response<Vec<u8>>;

/// The header line emitted by classic CGI scripts. Note the space before the first newline, it is
/// kept so output stays byte-identical with existing consumers.
pub fn content_type_header(mime: &str) -> String {
    format!("Content-Type: {mime} \n\n")
}

/// Write `content_type_header(mime)` to `w`.
pub fn write_content_type<W: Write>(w: &mut W, mime: &str) -> std::io::Result<()> {
    w.write_all(content_type_header(mime).as_bytes())
}

pub fn text_response(status: StatusCode, mime: &str, body: impl Into<Vec<u8>>) -> RawResponse {
    let body = body.into();

    let mut response = Response::new(Vec::new());

    *response.status_mut() = status;
    *response.version_mut() = Version::HTTP_11;

    if let Ok(value) = mime.parse() {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }

    response
        .headers_mut()
        .insert(http::header::CONTENT_LENGTH, body.len().into());

    *response.body_mut() = body;

    response
}

/// Write `response` in the form a CGI program hands it back to the server: a `Status` line, the
/// headers, a blank line and the body.
pub fn write_cgi_response<W: Write>(w: &mut W, response: &RawResponse) -> std::io::Result<()> {
    let status = response.status();

    writeln!(
        w,
        "Status: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )?;

    for (key, value) in response.headers() {
        w.write_all(key.as_str().as_bytes())?;

        write!(w, ": ")?;

        w.write_all(value.as_bytes())?;

        writeln!(w)?;
    }

    writeln!(w)?;

    w.write_all(response.body())
}

/// Conversion into a complete response.
pub trait IntoResponse {
    fn response(self) -> RawResponse;
}

impl IntoResponse for Error {
    fn response(self) -> RawResponse {
        text_response(
            self.status_code(),
            "text/plain; charset=utf-8",
            self.to_string(),
        )
    }
}

impl IntoResponse for StatusCode {
    fn response(self) -> RawResponse {
        text_response(self, "text/plain; charset=utf-8", Vec::new())
    }
}
