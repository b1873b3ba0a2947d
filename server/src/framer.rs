use std::io::{ErrorKind, Read, Write};

/// Marks the end of a request header block.
pub const HEADER_END: &[u8] = b"\r\n\r\n";

pub const READ_CHUNK: usize = 4096;

pub const DEFAULT_MAX_HEADER_BYTES: usize = 64 * 1024;

/// Cuts a byte stream into request headers.
///
/// Bytes read past a terminator stay buffered for the next call, so requests
/// pipelined into a single read are returned one at a time and in order.
pub struct ConnectionFramer<S> {
    stream: S,
    buffer: Vec<u8>,
    max_header_bytes: usize,
}

impl<S> ConnectionFramer<S> {
    pub fn new(stream: S) -> Self {
        Self::with_limit(stream, DEFAULT_MAX_HEADER_BYTES)
    }

    pub fn with_limit(stream: S, max_header_bytes: usize) -> Self {
        Self { stream, buffer: Vec::new(), max_header_bytes }
    }

    /// Bytes held back for the next request.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    // Removes and returns the first complete header, terminator included.
    fn take_header(&mut self, from: usize) -> Option<Vec<u8>> {
        let start = from.saturating_sub(HEADER_END.len() - 1);
        let pos = self.buffer[start..]
            .windows(HEADER_END.len())
            .position(|window| window == HEADER_END)?;
        let end = start + pos + HEADER_END.len();
        let rest = self.buffer.split_off(end);
        Some(std::mem::replace(&mut self.buffer, rest))
    }
}

impl<S: Read> ConnectionFramer<S> {
    /// The next request header, or `None` once the client is done.
    ///
    /// Blocks on the stream until a full header is buffered. End of stream, a
    /// read error, or a header longer than the configured limit all end the
    /// sequence; a trailing partial header is dropped.
    pub fn next_request(&mut self) -> Option<Vec<u8>> {
        if let Some(header) = self.take_header(0) {
            return Some(header);
        }

        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = match self.stream.read(&mut chunk) {
                Ok(0) => {
                    if !self.buffer.is_empty() {
                        tracing::debug!(bytes = self.buffer.len(), "stream closed inside a header");
                        self.buffer.clear();
                    }
                    return None;
                }
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::debug!(error = %err, "read failed");
                    return None;
                }
            };

            let scanned = self.buffer.len();
            self.buffer.extend_from_slice(&chunk[..n]);
            if let Some(header) = self.take_header(scanned) {
                return Some(header);
            }
            if self.buffer.len() > self.max_header_bytes {
                tracing::warn!(
                    bytes = self.buffer.len(),
                    limit = self.max_header_bytes,
                    "request header too large, closing connection"
                );
                self.buffer.clear();
                return None;
            }
        }
    }
}

impl<S: Write> ConnectionFramer<S> {
    /// Write a whole response. `false` means the connection is no longer usable.
    pub fn write_response(&mut self, response: &[u8]) -> bool {
        match self.stream.write_all(response).and_then(|()| self.stream.flush()) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "write failed");
                false
            }
        }
    }
}
