//! Usage: Desktop interactive session over a one-shot 127.0.0.1 callback listener.

use crate::auth::session::InteractiveAuthSession;
use crate::shared::error::{AppError, AppResult};
use reqwest::Url;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const SUCCESS_HTML: &str = "<html><body><h1>Sign-in complete</h1><p>You may close this window and return to the app.</p></body></html>";
const FAILURE_HTML: &str = "<html><body><h1>Sign-in failed</h1><p>You may close this window and retry from the app.</p></body></html>";

const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);

/// `InteractiveAuthSession` for desktop hosts: binds a loopback listener on a
/// fixed port, hands the authorization URL to a host-supplied opener (system
/// browser), and waits for the provider to redirect to
/// `http://127.0.0.1:{port}/...`.
///
/// The configured `redirect_uri` must point at the same port. Mobile hosts
/// implement the trait over their native webview instead.
pub struct LoopbackAuthSession {
    port: u16,
    wait_timeout: Duration,
    open_url: Box<dyn Fn(&Url) + Send + Sync>,
}

impl LoopbackAuthSession {
    pub fn new(port: u16, open_url: impl Fn(&Url) + Send + Sync + 'static) -> Self {
        Self {
            port,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            open_url: Box::new(open_url),
        }
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    async fn run(&self, authorize_url: Url) -> AppResult<Url> {
        let listener = TcpListener::bind(("127.0.0.1", self.port))
            .await
            .map_err(|e| {
                AppError::Network(format!(
                    "callback listener bind failed on 127.0.0.1:{}: {e}",
                    self.port
                ))
            })?;

        (self.open_url)(&authorize_url);

        // An abandoned browser tab never reports dismissal; the timeout is
        // the cancellation signal here.
        let accepted = tokio::time::timeout(self.wait_timeout, listener.accept())
            .await
            .map_err(|_| AppError::AuthCancelled)?;
        let (mut socket, _) = accepted
            .map_err(|e| AppError::Network(format!("callback accept failed: {e}")))?;

        let request = read_request_head(&mut socket).await?;
        let target = extract_request_target(&request)?;
        let callback = Url::parse(&format!("http://127.0.0.1:{}{target}", self.port))
            .map_err(|e| AppError::InvalidRequest(format!("callback target: {e}")))?;

        let failed = callback.query_pairs().any(|(key, _)| key == "error");
        let (status_line, body) = if failed {
            ("HTTP/1.1 400 Bad Request", FAILURE_HTML)
        } else {
            ("HTTP/1.1 200 OK", SUCCESS_HTML)
        };
        let response = format!(
            "{status_line}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;

        Ok(callback)
    }
}

impl InteractiveAuthSession for LoopbackAuthSession {
    fn present(
        &self,
        authorize_url: Url,
        _callback_scheme: &str,
    ) -> Pin<Box<dyn Future<Output = AppResult<Url>> + Send + '_>> {
        Box::pin(self.run(authorize_url))
    }
}

async fn read_request_head(socket: &mut TcpStream) -> AppResult<String> {
    let mut buffer = vec![0u8; 8192];
    let size = socket
        .read(&mut buffer)
        .await
        .map_err(|e| AppError::Network(format!("callback read failed: {e}")))?;
    if size == 0 {
        return Err(AppError::Network("callback request is empty".to_string()));
    }
    Ok(String::from_utf8_lossy(&buffer[..size]).into_owned())
}

fn extract_request_target(request: &str) -> AppResult<&str> {
    let first = request.lines().next().unwrap_or_default();
    let mut parts = first.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    if method != "GET" || target.is_empty() {
        return Err(AppError::InvalidRequest(
            "authorization callback must be a GET".to_string(),
        ));
    }
    Ok(target)
}
