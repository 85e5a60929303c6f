//! Loopback HTTP responder for download tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

/// Serve exactly one HTTP response on a fresh loopback port and return the
/// URL of a media file on it.
pub(crate) async fn serve_once(status: &'static str, body: &'static [u8]) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request_head(&mut socket).await;
        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
            body.len()
        );
        // The client may hang up early on error statuses.
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(body).await;
        let _ = socket.shutdown().await;
    });

    Url::parse(&format!("http://{addr}/media/served.jpg")).unwrap()
}

/// Announce `declared_len` bytes but send only `body`. With `hold_open` the
/// connection then stalls mid-body; otherwise it closes early.
pub(crate) async fn serve_partial(body: &'static [u8], declared_len: usize, hold_open: bool) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request_head(&mut socket).await;
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {declared_len}\r\nContent-Type: application/octet-stream\r\n\r\n"
        );
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(body).await;
        let _ = socket.flush().await;
        if hold_open {
            std::future::pending::<()>().await;
        }
    });

    Url::parse(&format!("http://{addr}/media/partial.mp4")).unwrap()
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }
}

/// HTTP client that never routes loopback requests through an env proxy.
pub(crate) fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
