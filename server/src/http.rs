//! The slice of HTTP/1.1 the server speaks: request lines in, fixed-length
//! responses out.

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl RequestLine {
    /// Parse `METHOD TARGET VERSION` from the first line of a header block.
    pub fn parse(header: &[u8]) -> Option<Self> {
        let end = header.windows(2).position(|w| w == b"\r\n")?;
        let line = std::str::from_utf8(&header[..end]).ok()?;
        let mut parts = line.split(' ').filter(|part| !part.is_empty());
        let method = parts.next()?.to_string();
        let target = parts.next()?.to_string();
        let version = parts.next()?.to_string();
        Some(Self { method, target, version })
    }
}

/// A request target split into a decoded path and decoded query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Target {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Target {
    pub fn parse(target: &str) -> Self {
        let target = target.split('#').next().unwrap_or_default();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        let path = percent_decode_str(path).decode_utf8_lossy().into_owned();
        let params = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        Self { path, params }
    }

    /// First value given for `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NotFound => 404,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::NotFound => "Not Found",
        }
    }
}

const NOT_FOUND_BODY: &str = "<html><body><h1>404 Not Found</h1></body></html>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn html(body: String) -> Self {
        Self { status: Status::Ok, content_type: Some("text/html"), body: body.into_bytes() }
    }

    pub fn plain(body: Vec<u8>) -> Self {
        Self { status: Status::Ok, content_type: Some("text/plain"), body }
    }

    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            content_type: Some("text/html"),
            body: NOT_FOUND_BODY.as_bytes().to_vec(),
        }
    }

    /// Status line, headers, blank line, body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status.code(), self.status.reason());
        if let Some(content_type) = self.content_type {
            head.push_str(&format!("Content-type: {content_type}\r\n"));
        }
        head.push_str(&format!("Content-length: {}\r\n\r\n", self.body.len()));

        let mut out = head.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}
