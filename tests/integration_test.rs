//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero, con un
//! directorio temporal como raíz de `/files/`.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use http_fileserver::config::Config;
use http_fileserver::server::Server;
use http_fileserver::storage::FileStorage;
use tempfile::TempDir;

/// Servidor corriendo en background; el directorio vive mientras viva el struct
struct TestServer {
    addr: SocketAddr,
    dir: TempDir,
}

fn start_server() -> TestServer {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::open(dir.path()).expect("storage");

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let server = Server::new(Config::default(), Arc::new(storage));
    thread::spawn(move || {
        let _ = server.serve(listener);
    });

    TestServer { addr, dir }
}

/// Helper: envía un request crudo y retorna la response completa
fn send_raw(server: &TestServer, raw: &[u8]) -> Result<String, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(server.addr)?;

    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    stream.write_all(raw)?;
    stream.flush()?;

    // El servidor cierra la conexión después de responder
    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;

    Ok(String::from_utf8(response)?)
}

fn get(server: &TestServer, path: &str) -> String {
    let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path);
    send_raw(server, request.as_bytes()).expect("Failed to send request")
}

fn post(server: &TestServer, path: &str, body: &str) -> String {
    let request = format!(
        "POST {} HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n{}",
        path,
        body.len(),
        body
    );
    send_raw(server, request.as_bytes()).expect("Failed to send request")
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

/// Helper: busca un header en la response, sin depender del orden
fn header<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    let head = &response[..response.find("\r\n\r\n")?];
    head.split("\r\n")
        .skip(1)
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(": "))
}

#[test]
fn test_root_endpoint() {
    let server = start_server();
    let response = get(&server, "/");

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert_eq!(header(&response, "Content-Length"), Some("0"));
    assert_eq!(extract_body(&response), "");
}

#[test]
fn test_echo_endpoint() {
    let server = start_server();
    let response = get(&server, "/echo/hello");

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(header(&response, "Content-Type"), Some("text/plain"));
    assert_eq!(header(&response, "Content-Length"), Some("5"));
    assert_eq!(extract_body(&response), "hello");
}

#[test]
fn test_echo_ignores_query() {
    let server = start_server();
    let response = get(&server, "/echo/abc?x=1");

    assert_eq!(extract_body(&response), "abc");
}

#[test]
fn test_user_agent_endpoint() {
    let server = start_server();
    let response = send_raw(
        &server,
        b"GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: foo/1.0\r\n\r\n",
    )
    .expect("Failed to send request");

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(extract_body(&response), "foo/1.0");
}

#[test]
fn test_user_agent_unknown() {
    let server = start_server();
    let response = get(&server, "/user-agent");

    assert_eq!(extract_body(&response), "Unknown");
}

#[test]
fn test_post_then_get_file() {
    let server = start_server();

    let created = post(&server, "/files/a.txt", "hi");
    assert!(created.starts_with("HTTP/1.1 201 Created\r\n"), "got: {}", created);
    assert_eq!(extract_body(&created), "ok");
    assert_eq!(std::fs::read(server.dir.path().join("a.txt")).unwrap(), b"hi");

    let fetched = get(&server, "/files/a.txt");
    assert!(fetched.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(header(&fetched, "Content-Type"), Some("application/octet-stream"));
    assert_eq!(extract_body(&fetched), "hi");
}

#[test]
fn test_repeated_post_overwrites() {
    let server = start_server();

    post(&server, "/files/a.txt", "a long first version");
    post(&server, "/files/a.txt", "v2");

    let fetched = get(&server, "/files/a.txt");
    assert_eq!(extract_body(&fetched), "v2");
}

#[test]
fn test_large_file_round_trip() {
    let server = start_server();
    let body = "0123456789".repeat(1000);

    let created = post(&server, "/files/big.txt", &body);
    assert!(created.starts_with("HTTP/1.1 201 Created\r\n"));

    let fetched = get(&server, "/files/big.txt");
    assert_eq!(header(&fetched, "Content-Length"), Some("10000"));
    assert_eq!(extract_body(&fetched), body);
}

#[test]
fn test_get_missing_file() {
    let server = start_server();
    let response = get(&server, "/files/missing.txt");

    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn test_not_found() {
    let server = start_server();

    for path in ["/unknown/path", "/echo", "/files", "/index.html"] {
        let response = get(&server, path);
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "path {}", path);
        assert_eq!(extract_body(&response), "");
    }
}

#[test]
fn test_bad_request() {
    let server = start_server();
    let response = send_raw(&server, b"NONSENSE\r\n\r\n").expect("Failed to send request");

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[test]
fn test_concurrent_clients() {
    let server = Arc::new(start_server());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let server = Arc::clone(&server);
            thread::spawn(move || {
                let name = format!("/files/f{}.txt", i);
                let body = format!("content-{}", i);
                post(&server, &name, &body);
                let fetched = get(&server, &name);
                assert_eq!(extract_body(&fetched), body);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
