use crate::connection::handle_connection;
use crate::pool::WorkerPool;
use crate::router::AppState;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

/// Accepts connections and hands each one to the worker pool.
pub struct Listener {
    inner: TcpListener,
    max_header_bytes: usize,
}

impl Listener {
    pub fn bind(addr: SocketAddr, max_header_bytes: usize) -> io::Result<Self> {
        let inner = TcpListener::bind(addr)?;
        Ok(Self { inner, max_header_bytes })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accept forever. A failed accept is logged and skipped.
    pub fn serve(&self, pool: &WorkerPool, state: Arc<AppState>) {
        for stream in self.inner.incoming() {
            match stream {
                Ok(stream) => {
                    let state = Arc::clone(&state);
                    let max_header_bytes = self.max_header_bytes;
                    pool.submit(move || handle_connection(stream, &state, max_header_bytes));
                }
                Err(err) => tracing::warn!(error = %err, "accept failed"),
            }
        }
    }
}
