use server::build_server;
use server::config::ServerConfig;
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

struct Reply {
    status_line: String,
    body: String,
}

fn build_tiny_tree(dir: &Path) {
    fs::write(dir.join("a.txt"), "Cat dog. Cat!").unwrap();
    fs::write(dir.join("b.txt"), "dog bird").unwrap();
}

fn local_config(root: &Path, workers: usize) -> ServerConfig {
    let mut config = ServerConfig::new(0, root);
    config.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
    config.workers = workers;
    config
}

fn start(root: &Path, workers: usize) -> SocketAddr {
    start_with(&local_config(root, workers))
}

fn start_with(config: &ServerConfig) -> SocketAddr {
    let (listener, pool, state) = build_server(config).unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || listener.serve(&pool, state));
    addr
}

fn connect(addr: SocketAddr) -> BufReader<TcpStream> {
    let stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    BufReader::new(stream)
}

fn read_reply(reader: &mut BufReader<TcpStream>) -> Reply {
    let mut status_line = String::new();
    reader.read_line(&mut status_line).unwrap();
    let mut length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        if line == "\r\n" {
            break;
        }
        if let Some(value) = line.strip_prefix("Content-length: ") {
            length = value.trim().parse().unwrap();
        }
    }
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).unwrap();
    Reply { status_line: status_line.trim_end().to_string(), body: String::from_utf8(body).unwrap() }
}

fn send(reader: &mut BufReader<TcpStream>, bytes: &[u8]) {
    reader.get_mut().write_all(bytes).unwrap();
}

#[test]
fn pipelined_requests_are_answered_in_order() {
    let dir = tempdir().unwrap();
    build_tiny_tree(dir.path());
    let addr = start(dir.path(), 2);

    let mut conn = connect(addr);
    send(
        &mut conn,
        b"GET / HTTP/1.1\r\nHost: x\r\n\r\nGET /query?terms=cat+dog HTTP/1.1\r\n\r\nGET /missing HTTP/1.1\r\n\r\n",
    );

    let home = read_reply(&mut conn);
    assert_eq!(home.status_line, "HTTP/1.1 200 OK");
    assert!(home.body.contains("<form"));

    let results = read_reply(&mut conn);
    assert_eq!(results.status_line, "HTTP/1.1 200 OK");
    assert!(results.body.contains("1 results found for <b>cat dog</b>"));
    assert!(results.body.contains("a.txt"));
    assert!(results.body.contains("[3]"));

    let missing = read_reply(&mut conn);
    assert_eq!(missing.status_line, "HTTP/1.1 404 Not Found");
}

#[test]
fn request_split_into_single_bytes() {
    let dir = tempdir().unwrap();
    build_tiny_tree(dir.path());
    let addr = start(dir.path(), 1);

    let mut conn = connect(addr);
    conn.get_ref().set_nodelay(true).unwrap();
    for byte in b"GET /query?terms=dog HTTP/1.1\r\n\r\n" {
        send(&mut conn, &[*byte]);
    }
    let reply = read_reply(&mut conn);
    assert!(reply.body.contains("2 results found for <b>dog</b>"));
}

#[test]
fn static_files_are_served_from_root() {
    let dir = tempdir().unwrap();
    build_tiny_tree(dir.path());
    let addr = start(dir.path(), 2);

    let mut conn = connect(addr);
    send(&mut conn, b"GET /static/b.txt HTTP/1.1\r\n\r\nGET /static/../b.txt HTTP/1.1\r\n\r\n");
    let file = read_reply(&mut conn);
    assert_eq!(file.status_line, "HTTP/1.1 200 OK");
    assert_eq!(file.body, "dog bird");
    let escaped = read_reply(&mut conn);
    assert_eq!(escaped.status_line, "HTTP/1.1 404 Not Found");
}

#[test]
fn many_clients_are_served_concurrently() {
    let dir = tempdir().unwrap();
    build_tiny_tree(dir.path());
    let addr = start(dir.path(), 4);

    let clients: Vec<_> = (0..16)
        .map(|_| {
            thread::spawn(move || {
                let mut conn = connect(addr);
                for _ in 0..5 {
                    send(&mut conn, b"GET /query?terms=cat HTTP/1.1\r\n\r\n");
                    let reply = read_reply(&mut conn);
                    assert!(reply.body.contains("1 results found for <b>cat</b>"));
                    assert!(reply.body.contains("[2]"));
                }
            })
        })
        .collect();
    for client in clients {
        client.join().unwrap();
    }
}

#[test]
fn stalled_client_only_holds_its_own_worker() {
    let dir = tempdir().unwrap();
    build_tiny_tree(dir.path());
    let addr = start(dir.path(), 2);

    // Occupies one worker indefinitely with a header that never ends.
    let mut stalled = connect(addr);
    send(&mut stalled, b"GET / HTTP/1.1\r\n");

    let mut live = connect(addr);
    send(&mut live, b"GET / HTTP/1.1\r\n\r\n");
    assert_eq!(read_reply(&mut live).status_line, "HTTP/1.1 200 OK");
}

#[test]
fn oversized_header_closes_only_that_connection() {
    let dir = tempdir().unwrap();
    build_tiny_tree(dir.path());
    let mut config = local_config(dir.path(), 2);
    config.max_header_bytes = 256;
    let addr = start_with(&config);

    let mut flood = connect(addr);
    send(&mut flood, &[b'a'; 300]);
    let mut buf = [0u8; 16];
    match flood.read(&mut buf) {
        Ok(n) => assert_eq!(n, 0, "expected the server to close the connection"),
        Err(err) => assert!(
            !matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut),
            "connection was left open: {err}"
        ),
    }

    let mut live = connect(addr);
    send(&mut live, b"GET / HTTP/1.1\r\n\r\n");
    assert_eq!(read_reply(&mut live).status_line, "HTTP/1.1 200 OK");
}

#[test]
fn zero_workers_fails_to_start() {
    let dir = tempdir().unwrap();
    build_tiny_tree(dir.path());
    assert!(build_server(&local_config(dir.path(), 0)).is_err());
}

#[test]
fn missing_root_fails_to_start() {
    let dir = tempdir().unwrap();
    let mut config = ServerConfig::new(0, dir.path().join("absent"));
    config.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
    assert!(build_server(&config).is_err());
}
