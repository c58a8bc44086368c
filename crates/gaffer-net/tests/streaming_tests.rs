//! Tests against a hand-driven HTTP server, for behaviour that depends on
//! when bytes arrive on the wire.

use std::future::Future;
use std::time::Duration;

use gaffer_core::{GetAllElements, Limit};
use gaffer_net::{GafferClient, GafferError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

const CHUNKED_HEAD: &str = "HTTP/1.1 200 OK\r\n\
    Content-Type: application/x-ndjson\r\n\
    Transfer-Encoding: chunked\r\n\r\n";

/// Accept one connection, consume the request, then hand the socket over.
async fn serve_once<F, Fut>(handler: F) -> String
where
    F: FnOnce(TcpStream) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_request(&mut stream).await;
        handler(stream).await;
    });
    format!("http://{}", addr)
}

async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + length {
            return;
        }
    }
}

async fn write_chunk(stream: &mut TcpStream, data: &str) {
    let frame = format!("{:x}\r\n{}\r\n", data.len(), data);
    stream.write_all(frame.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();
}

async fn finish_chunks(stream: &mut TcpStream) {
    stream.write_all(b"0\r\n\r\n").await.unwrap();
    stream.flush().await.unwrap();
}

fn client_for(url: &str, timeout: Option<Duration>) -> GafferClient {
    let mut builder = GafferClient::builder().url(url);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build_with_env(|_: &str| None)
        .expect("Failed to build client")
}

#[tokio::test]
async fn test_chunked_lines_arrive_before_body_completes() {
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let url = serve_once(move |mut stream| async move {
        stream.write_all(CHUNKED_HEAD.as_bytes()).await.unwrap();
        write_chunk(&mut stream, "{\"n\":1}\n").await;

        // Hold the rest of the results until the client has seen the first.
        let _ = release_rx.await;
        write_chunk(&mut stream, "{\"n\":2}\n").await;
        write_chunk(&mut stream, "{\"n\":3}\n").await;
        finish_chunks(&mut stream).await;
    })
    .await;

    let client = client_for(&url, None);
    let mut lines = client
        .execute_chunked(GetAllElements::new())
        .await
        .expect("Chunked execute failed");

    let first = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("First line should arrive while the server holds the rest")
        .unwrap();
    assert_eq!(first.as_deref(), Some("{\"n\":1}"));

    // Nothing more has been sent yet.
    assert!(
        tokio::time::timeout(Duration::from_millis(200), lines.next_line())
            .await
            .is_err()
    );

    release_tx.send(()).unwrap();
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("{\"n\":2}"));
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("{\"n\":3}"));
    assert!(lines.next_line().await.unwrap().is_none());
    assert_eq!(lines.lines_read(), 3);
}

#[tokio::test]
async fn test_chunked_stream_outlives_request_timeout() {
    let url = serve_once(|mut stream| async move {
        stream.write_all(CHUNKED_HEAD.as_bytes()).await.unwrap();
        write_chunk(&mut stream, "a\n").await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        write_chunk(&mut stream, "b\n").await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        write_chunk(&mut stream, "c\n").await;
        finish_chunks(&mut stream).await;
    })
    .await;

    let client = client_for(&url, Some(Duration::from_millis(250)));
    let lines = client
        .execute_chunked(Limit::new(3))
        .await
        .expect("Chunked execute failed")
        .collect_lines()
        .await
        .expect("Stream should not time out");

    assert_eq!(lines, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_buffered_execute_honours_request_timeout() {
    let url = serve_once(|mut stream| async move {
        tokio::time::sleep(Duration::from_millis(800)).await;
        let _ = stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n[]")
            .await;
    })
    .await;

    let client = client_for(&url, Some(Duration::from_millis(250)));
    let err = client.execute(Limit::new(1)).await.unwrap_err();

    match err {
        GafferError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("Expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_truncated_error_body_is_transport_error() {
    let url = serve_once(|mut stream| async move {
        stream
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial")
            .await
            .unwrap();
        stream.flush().await.unwrap();
        drop(stream);
    })
    .await;

    let client = client_for(&url, None);
    let err = client.execute(Limit::new(1)).await.unwrap_err();

    assert!(matches!(err, GafferError::Transport(_)));
    assert!(!err.is_service());
}
