use anyhow::Result;
use clap::Parser;
use server::build_server;
use server::config::{ServerConfig, DEFAULT_WORKERS};
use server::framer::DEFAULT_MAX_HEADER_BYTES;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server", about = "Serve ranked searches over a directory of text files")]
struct Args {
    /// Port to listen on
    port: u16,
    /// Directory to index and serve under /static/
    root_directory: PathBuf,
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    /// Number of worker threads
    #[arg(long, env = "SEARCH_WORKERS", default_value_t = DEFAULT_WORKERS, value_parser = parse_workers)]
    workers: usize,
    /// Largest request header accepted before the connection is dropped
    #[arg(long, env = "SEARCH_MAX_HEADER_BYTES", default_value_t = DEFAULT_MAX_HEADER_BYTES)]
    max_header_bytes: usize,
}

// A pool with no workers would accept connections and never answer them.
fn parse_workers(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut config = ServerConfig::new(args.port, args.root_directory);
    config.host = args.host;
    config.workers = args.workers;
    config.max_header_bytes = args.max_header_bytes;

    let (listener, pool, state) = build_server(&config)?;
    tracing::info!(addr = %listener.local_addr()?, workers = pool.live_workers(), "accepting connections");
    listener.serve(&pool, state);
    pool.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_port_and_root() {
        let args = Args::try_parse_from(["server", "8080", "docs"]).unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.root_directory, PathBuf::from("docs"));
        assert_eq!(args.max_header_bytes, DEFAULT_MAX_HEADER_BYTES);
        assert_eq!(args.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn rejects_wrong_argument_count() {
        assert!(Args::try_parse_from(["server"]).is_err());
        assert!(Args::try_parse_from(["server", "8080"]).is_err());
        assert!(Args::try_parse_from(["server", "8080", "docs", "extra"]).is_err());
        assert!(Args::try_parse_from(["server", "not-a-port", "docs"]).is_err());
        assert!(Args::try_parse_from(["server", "--workers", "0", "8080", "docs"]).is_err());
        assert!(Args::try_parse_from(["server", "--workers", "-1", "8080", "docs"]).is_err());
    }

    #[test]
    fn accepts_positive_worker_count() {
        let args = Args::try_parse_from(["server", "--workers", "2", "8080", "docs"]).unwrap();
        assert_eq!(args.workers, 2);
    }
}
