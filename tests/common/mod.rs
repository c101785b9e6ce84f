#![allow(dead_code)]

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Notify};

/// A request as received by [`MockService`]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

/// Canned reply for one request
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string() }
    }
}

/// A tiny HTTP/1.1 responder standing in for the classification service.
///
/// Replies are served in order; the last one repeats. When `hold` is set,
/// every reply waits for [`MockService::release`] before being written.
pub struct MockService {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    gate: Arc<Notify>,
}

impl MockService {
    pub async fn start(replies: Vec<Reply>) -> Self {
        Self::spawn(replies, false).await
    }

    pub async fn start_held(replies: Vec<Reply>) -> Self {
        Self::spawn(replies, true).await
    }

    async fn spawn(replies: Vec<Reply>, hold: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock service");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new(Notify::new());

        let captured = Arc::clone(&requests);
        let release = Arc::clone(&gate);
        tokio::spawn(async move {
            let mut served = 0usize;
            while let Ok((stream, _)) = listener.accept().await {
                let reply = replies[served.min(replies.len() - 1)].clone();
                served += 1;
                let captured = Arc::clone(&captured);
                let release = Arc::clone(&release);
                tokio::spawn(async move {
                    serve(stream, reply, captured, hold.then_some(release)).await;
                });
            }
        });

        Self { base_url, requests, gate }
    }

    /// Lets one held reply go out
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }

    /// Waits until at least `n` requests have been received
    pub async fn wait_for_requests(&self, n: usize) {
        for _ in 0..200 {
            if self.requests.lock().await.len() >= n {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("mock service never received {} requests", n);
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

async fn serve(
    mut stream: TcpStream,
    reply: Reply,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    gate: Option<Arc<Notify>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    captured.lock().await.push(CapturedRequest { method, path, headers, body });

    if let Some(gate) = gate {
        gate.notified().await;
    }

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason(reply.status),
        reply.body.len(),
        reply.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// A base URL nothing is listening on
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub const VERSICOLOR: &str =
    r#"{"species":"versicolor","probabilities":{"setosa":0.02,"versicolor":0.91,"virginica":0.07}}"#;

pub const SETOSA: &str =
    r#"{"species":"setosa","probabilities":{"setosa":0.97,"versicolor":0.02,"virginica":0.01}}"#;
