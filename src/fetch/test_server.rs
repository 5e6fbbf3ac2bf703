// src/fetch/test_server.rs
//
// Minimal HTTP/1.1 responder for fetch tests: fixed routes, one response per
// connection, unknown paths get 404. Counts requests per path.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};
use url::Url;

/// How a route frames its body.
#[derive(Debug, Clone, Copy)]
pub enum Framing {
    /// Accurate `Content-Length`.
    Length,
    /// No `Content-Length`; the body ends when the connection closes.
    CloseDelimited,
    /// Declares `declared` bytes but sends only the body, then closes.
    Truncated { declared: usize },
}

pub struct TestServer {
    base: Url,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl TestServer {
    pub async fn start(routes: Vec<(&str, u16, Vec<u8>)>) -> anyhow::Result<Self> {
        Self::start_framed(
            routes
                .into_iter()
                .map(|(p, s, b)| (p, s, b, Framing::Length))
                .collect(),
        )
        .await
    }

    pub async fn start_framed(
        routes: Vec<(&str, u16, Vec<u8>, Framing)>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base = Url::parse(&format!("http://{}/", listener.local_addr()?))?;
        let routes: Arc<HashMap<String, (u16, Vec<u8>, Framing)>> = Arc::new(
            routes
                .into_iter()
                .map(|(p, s, b, f)| (p.to_string(), (s, b, f)))
                .collect(),
        );
        let hits = Arc::new(Mutex::new(HashMap::new()));

        let hits_c = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits_c);
                tokio::spawn(async move {
                    let mut req = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                        match sock.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => req.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&req);
                    let path = head
                        .lines()
                        .next()
                        .and_then(|l| l.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    *hits.lock().unwrap().entry(path.clone()).or_default() += 1;

                    let (status, body, framing) = routes.get(&path).cloned().unwrap_or((
                        404,
                        b"not found".to_vec(),
                        Framing::Length,
                    ));
                    let length = match framing {
                        Framing::Length => format!("Content-Length: {}\r\n", body.len()),
                        Framing::CloseDelimited => String::new(),
                        Framing::Truncated { declared } => {
                            format!("Content-Length: {declared}\r\n")
                        }
                    };
                    let header =
                        format!("HTTP/1.1 {status} X\r\n{length}Connection: close\r\n\r\n");
                    let _ = sock.write_all(header.as_bytes()).await;
                    let _ = sock.write_all(&body).await;
                    let _ = sock.shutdown().await;
                });
            }
        });

        Ok(Self { base, hits })
    }

    pub fn url(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}
