use crate::framer::ConnectionFramer;
use crate::router::{handle_request, AppState};
use std::io::{Read, Write};
use std::net::TcpStream;

/// Serve pipelined requests on one stream until the client stops or a write fails.
///
/// Returns how many responses were written.
pub fn serve_stream<S: Read + Write>(framer: &mut ConnectionFramer<S>, state: &AppState) -> usize {
    let mut served = 0;
    while let Some(header) = framer.next_request() {
        let response = handle_request(&header, state);
        if !framer.write_response(&response.to_bytes()) {
            break;
        }
        served += 1;
    }
    served
}

/// Pool task for one accepted TCP connection.
pub fn handle_connection(stream: TcpStream, state: &AppState, max_header_bytes: usize) {
    let peer = stream.peer_addr().map(|addr| addr.to_string()).unwrap_or_else(|_| "unknown".into());
    tracing::debug!(%peer, "connection opened");
    let mut framer = ConnectionFramer::with_limit(stream, max_header_bytes);
    let served = serve_stream(&mut framer, state);
    tracing::debug!(%peer, served, "connection closed");
}
