//! Tiny HTTP/1.1 server for exercising the clients against canned responses.
//!
//! Every connection serves exactly one request and is closed afterwards, so the
//! client never reuses a socket. Unrouted requests get a 404.

use std::collections::HashMap;
use std::io::{Read as _, Write as _};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Clone)]
struct CannedResponse {
    status: u16,
    reason: &'static str,
    content_type: &'static str,
    body: String,
}

pub struct TestServer {
    addr: SocketAddr,
    routes: Arc<Mutex<HashMap<String, CannedResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind server");
        let addr = listener.local_addr().expect("server addr");
        let routes: Arc<Mutex<HashMap<String, CannedResponse>>> = Arc::default();
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();

        let server_routes = Arc::clone(&routes);
        let server_requests = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle_connection(stream, &server_routes, &server_requests);
            }
        });

        Self {
            addr,
            routes,
            requests,
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.addr.port())
    }

    /// Registers a response for `method` + request target (path and query).
    pub fn route(&self, method: &str, target: &str, status: u16, content_type: &'static str, body: &str) {
        let reason = match status {
            200 => "OK",
            201 => "Created",
            401 => "Unauthorized",
            404 => "Not Found",
            409 => "Conflict",
            500 => "Internal Server Error",
            _ => "Status",
        };
        self.routes.lock().expect("routes lock").insert(
            format!("{method} {target}"),
            CannedResponse {
                status,
                reason,
                content_type,
                body: body.to_string(),
            },
        );
    }

    pub fn xml(&self, method: &str, target: &str, status: u16, body: &str) {
        self.route(method, target, status, "text/xml", body);
    }

    pub fn json(&self, target: &str, body: &str) {
        self.route("GET", target, 200, "application/json", body);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn requests_to(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

fn handle_connection(
    mut stream: TcpStream,
    routes: &Mutex<HashMap<String, CannedResponse>>,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let key = format!("{} {}", request.method, request.target);
    let canned = routes.lock().expect("routes lock").get(&key).cloned();
    requests.lock().expect("requests lock").push(request);

    let canned = canned.unwrap_or(CannedResponse {
        status: 404,
        reason: "Not Found",
        content_type: "text/plain",
        body: String::new(),
    });
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        canned.status,
        canned.reason,
        canned.content_type,
        canned.body.len(),
        canned.body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut scratch = [0u8; 4096];

    let headers_end = loop {
        match stream.read(&mut scratch) {
            Ok(0) | Err(_) => return None,
            Ok(n) => {
                buf.extend_from_slice(&scratch[..n]);
                if let Some(end) = find_double_crlf(&buf) {
                    break end;
                }
            }
        }
    };

    let head = String::from_utf8_lossy(&buf[..headers_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let body_len = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < headers_end + body_len {
        match stream.read(&mut scratch) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&scratch[..n]),
        }
    }
    let body_end = buf.len().min(headers_end + body_len);
    let body = String::from_utf8_lossy(&buf[headers_end..body_end]).to_string();

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

fn find_double_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}
