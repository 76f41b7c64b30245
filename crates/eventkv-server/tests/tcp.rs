use eventkv_server::{Server, ServerConfig};
use eventkv_store::{KvService, MemoryStore};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

async fn start() -> (SocketAddr, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let config = ServerConfig {
        addr: "127.0.0.1:0".to_string(),
        max_body_bytes: 1024,
    };
    let server = Server::bind(&config, KvService::new(MemoryStore::new()))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .run_until(async {
                let _ = rx.await;
            })
            .await
            .unwrap();
    });
    (addr, tx, handle)
}

async fn send(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_round_trip_over_socket() {
    let (addr, shutdown, handle) = start().await;

    let created = send(
        addr,
        "POST /api HTTP/1.1\r\nHost: test\r\nContent-Type: application/json\r\nContent-Length: 17\r\n\r\n{\"key1\":\"value1\"}",
    )
    .await;
    assert!(created.starts_with("HTTP/1.1 201 Created\r\n"), "{created}");

    let read = send(addr, "GET /api/key1 HTTP/1.1\r\nHost: test\r\n\r\n").await;
    assert!(read.starts_with("HTTP/1.1 200 OK\r\n"), "{read}");
    assert!(read.contains("Content-Type: text/plain\r\n"), "{read}");
    assert!(read.ends_with("\r\n\r\nvalue1"), "{read}");

    let deleted = send(addr, "DELETE /api/key1 HTTP/1.1\r\nHost: test\r\n\r\n").await;
    assert!(deleted.starts_with("HTTP/1.1 204 No Content\r\n"), "{deleted}");

    let history = send(addr, "GET /api/key1/history HTTP/1.1\r\nHost: test\r\n\r\n").await;
    assert!(history.contains("Content-Type: application/json\r\n"), "{history}");
    assert!(
        history.ends_with(r#"[{"event":"create","value":"value1"},{"event":"delete","value":""}]"#),
        "{history}"
    );

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_protocol_errors_over_socket() {
    let (addr, shutdown, handle) = start().await;

    let too_large = send(
        addr,
        "POST /api HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 4096\r\n\r\n",
    )
    .await;
    assert!(too_large.starts_with("HTTP/1.1 413 "), "{too_large}");

    let malformed = send(addr, "NOT-HTTP\r\n\r\n").await;
    assert!(malformed.starts_with("HTTP/1.1 400 "), "{malformed}");

    let missing = send(addr, "GET /elsewhere HTTP/1.1\r\n\r\n").await;
    assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"), "{missing}");
    assert!(missing.ends_with("Content-Length: 0\r\nConnection: close\r\n\r\n"), "{missing}");

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}
