//! Multi-threaded search server over an in-memory inverted index.
//!
//! The accept loop ([`listener::Listener`]) submits one task per connection to a
//! fixed [`pool::WorkerPool`]. A worker frames pipelined requests with
//! [`framer::ConnectionFramer`], routes each through [`router::handle_request`]
//! against the shared index, and writes the response back.

pub mod config;
pub mod connection;
pub mod framer;
pub mod html;
pub mod http;
pub mod listener;
pub mod pool;
pub mod router;

use anyhow::{ensure, Context, Result};
use config::ServerConfig;
use listener::Listener;
use pool::WorkerPool;
use router::AppState;
use search_core::crawl::crawl_filetree;
use std::sync::Arc;

/// Crawl the root, bind the listener, and start the workers.
pub fn build_server(config: &ServerConfig) -> Result<(Listener, WorkerPool, Arc<AppState>)> {
    ensure!(config.workers > 0, "at least one worker is required");
    let index = crawl_filetree(&config.root)
        .with_context(|| format!("failed to build search index from {}", config.root.display()))?;
    let state = Arc::new(AppState::new(index.into_shared(), config.root.clone()));

    let addr = config.bind_addr();
    let listener = Listener::bind(addr, config.max_header_bytes)
        .with_context(|| format!("failed to bind {addr}"))?;
    let pool = WorkerPool::start(config.workers);
    Ok((listener, pool, state))
}
