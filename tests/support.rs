//! Shared helpers for integration tests: a canned-response localhost HTTP
//! responder and a scripted interactive auth session.

#![allow(dead_code)]

use admob_earn_lib::{AppError, AppResult, InteractiveAuthSession};
use reqwest::Url;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One canned route: requests whose target starts with `path` get this
/// status and body. First match wins, so list specific paths first.
pub struct CannedRoute {
    path: &'static str,
    status: u16,
    body: String,
    delay: Duration,
}

impl CannedRoute {
    pub fn new(path: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            path,
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Raw requests seen so far, one entry per connection (request line,
    /// headers and body).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn spawn_server(routes: Vec<CannedRoute>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("test server addr");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let raw = read_http_request(&mut socket).await;
            let target = raw
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or_default()
                .to_string();
            seen.lock().unwrap().push(raw);

            let (status, body, delay) = routes
                .iter()
                .find(|route| target.starts_with(route.path))
                .map(|route| (route.status, route.body.clone(), route.delay))
                .unwrap_or((404, String::from("{}"), Duration::ZERO));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let reason = if (200..300).contains(&status) { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    TestServer { addr, requests }
}

async fn read_http_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];
    loop {
        let Ok(size) = socket.read(&mut buffer).await else {
            break;
        };
        if size == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..size]);

        if let Some(header_end) = find_header_end(&data) {
            let head = String::from_utf8_lossy(&data[..header_end]);
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|window| window == b"\r\n\r\n")
}

/// Scripted interactive session: redirects straight back with a canned code,
/// echoing the state from the authorize URL unless told to forge one.
pub struct FakeAuthSession {
    redirect_uri: String,
    code: &'static str,
    forge_state: Option<&'static str>,
    cancel: bool,
}

impl FakeAuthSession {
    pub fn returning_code(redirect_uri: impl Into<String>, code: &'static str) -> Self {
        Self {
            redirect_uri: redirect_uri.into(),
            code,
            forge_state: None,
            cancel: false,
        }
    }

    pub fn forging_state(redirect_uri: impl Into<String>, state: &'static str) -> Self {
        Self {
            redirect_uri: redirect_uri.into(),
            code: "unused-code",
            forge_state: Some(state),
            cancel: false,
        }
    }

    pub fn cancelling() -> Self {
        Self {
            redirect_uri: String::new(),
            code: "",
            forge_state: None,
            cancel: true,
        }
    }
}

impl InteractiveAuthSession for FakeAuthSession {
    fn present(
        &self,
        authorize_url: Url,
        _callback_scheme: &str,
    ) -> Pin<Box<dyn Future<Output = AppResult<Url>> + Send + '_>> {
        let result = if self.cancel {
            Err(AppError::AuthCancelled)
        } else {
            let state = self
                .forge_state
                .map(str::to_string)
                .or_else(|| {
                    authorize_url
                        .query_pairs()
                        .find(|(key, _)| key == "state")
                        .map(|(_, value)| value.into_owned())
                })
                .unwrap_or_default();
            Url::parse(&format!(
                "{}?code={}&state={}",
                self.redirect_uri, self.code, state
            ))
            .map_err(|e| AppError::InvalidRequest(e.to_string()))
        };
        Box::pin(async move { result })
    }
}
