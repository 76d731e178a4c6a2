//! response formatting
//!
//! every reply is `HTTP/1.1 <code> <reason>\n`, one `Content-Type` line, a
//! blank line and the body. lines end with a bare `\n`, not CRLF; clients of
//! this server already depend on that.

use std::fmt;

/// returned verbatim, without any status line, when no GET line was received
pub const ILLEGAL_REQUEST: &[u8] = b"<html>Illegal request: no GET</html>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
    ServiceUnavailable,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
            Status::ServiceUnavailable => 503,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
            Status::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Json,
    Plain,
}

impl ContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            ContentType::Json => "application/json",
            ContentType::Plain => "text/plain",
        }
    }
}

/// a fully formed reply, ready to be written to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub content_type: ContentType,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: Status, content_type: ContentType, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn html(status: Status, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, ContentType::Html, body)
    }

    pub fn ok_html(body: impl Into<Vec<u8>>) -> Self {
        Self::html(Status::Ok, body)
    }

    pub fn ok_json(body: impl Into<Vec<u8>>) -> Self {
        Self::new(Status::Ok, ContentType::Json, body)
    }

    pub fn ok_text(body: impl Into<Vec<u8>>) -> Self {
        Self::new(Status::Ok, ContentType::Plain, body)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// serialize into the bytes written back on the socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let head = format!(
            "HTTP/1.1 {}\nContent-Type: {}; charset=utf-8\n\n",
            self.status,
            self.content_type.mime()
        );

        let mut out = Vec::with_capacity(head.len() + self.body.len());
        out.extend_from_slice(head.as_bytes());
        out.extend_from_slice(&self.body);
        out
    }
}
