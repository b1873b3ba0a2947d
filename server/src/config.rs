use crate::framer::DEFAULT_MAX_HEADER_BYTES;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_WORKERS: usize = 4;

/// Resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub root: PathBuf,
    pub workers: usize,
    pub max_header_bytes: usize,
}

impl ServerConfig {
    pub fn new(port: u16, root: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port,
            root: root.into(),
            workers: DEFAULT_WORKERS,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
