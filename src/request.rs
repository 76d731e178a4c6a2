//! request line reading
//!
//! a connection is read line by line until the blank line that closes the
//! header block (or EOF). the first well-formed `GET <path> HTTP/<ver>` line
//! becomes the request, everything else is logged and ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// header lines read before giving up on finding the end of the block
pub const MAX_HEADER_LINES: usize = 100;
/// bytes a single line may take, terminator included
pub const MAX_LINE_BYTES: usize = 8 * 1024;

// the single character after the space is dropped, normally the leading '/'
static REQUEST_LINE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^GET .(\S*) HTTP/(\d+(?:\.\d+)?)\s*$").ok());

/// the parsed request, everything after `GET /` up to the version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl Request {
    /// parse a single request line, None when it is not a well-formed GET
    pub fn parse_line(line: &str) -> Option<Request> {
        let caps = REQUEST_LINE.as_ref()?.captures(line)?;
        Some(Request {
            method: "GET".to_string(),
            target: caps[1].to_string(),
            version: caps[2].to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    ReadingHeaders,
    Dispatching,
}

/// two-state machine fed one line at a time
#[derive(Debug)]
pub struct RequestReader {
    state: ReaderState,
    request: Option<Request>,
    lines_seen: usize,
}

impl Default for RequestReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestReader {
    pub fn new() -> Self {
        Self {
            state: ReaderState::ReadingHeaders,
            request: None,
            lines_seen: 0,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// feed one line with its terminator already stripped
    pub fn feed(&mut self, line: &str) -> ReaderState {
        if self.state == ReaderState::Dispatching {
            return self.state;
        }

        log::debug!("received: {}", line);
        self.lines_seen += 1;

        if line.is_empty() {
            self.state = ReaderState::Dispatching;
        } else if line.starts_with("GET") && self.request.is_none() {
            match Request::parse_line(line) {
                Some(request) => self.request = Some(request),
                None => log::debug!("ignoring malformed GET line: {}", line),
            }
        }

        if self.lines_seen >= MAX_HEADER_LINES {
            log::warn!("header block exceeded {} lines, dispatching early", MAX_HEADER_LINES);
            self.state = ReaderState::Dispatching;
        }

        self.state
    }

    /// a line ran past `MAX_LINE_BYTES`, the line itself is dropped
    pub fn overflow(&mut self) {
        log::warn!("header line exceeded {} bytes, dispatching early", MAX_LINE_BYTES);
        self.state = ReaderState::Dispatching;
    }

    /// the stream ended, whatever we have is all we get
    pub fn finish(&mut self) {
        self.state = ReaderState::Dispatching;
    }

    pub fn into_request(self) -> Option<Request> {
        self.request
    }
}

/// read the header block from a stream and return the GET request, if any
pub async fn read_request<R>(reader: &mut R) -> std::io::Result<Option<Request>>
where
    R: AsyncBufRead + Unpin,
{
    let mut machine = RequestReader::new();
    let mut buf = Vec::new();

    while machine.state() == ReaderState::ReadingHeaders {
        buf.clear();
        let n = (&mut *reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await?;
        if n == 0 {
            machine.finish();
            break;
        }
        if n == MAX_LINE_BYTES && !buf.ends_with(b"\n") {
            machine.overflow();
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches('\n').trim_end_matches('\r');
        machine.feed(line);
    }

    Ok(machine.into_request())
}
