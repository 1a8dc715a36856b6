//! Client side of the remote entries API.
//!
//! The server is an external collaborator; only two calls are used:
//! `GET /api/entries` and `POST /api/entries`.

use crate::{Entry, Result, TradebookError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Path of the entries collection relative to the backend base URL.
pub const ENTRIES_PATH: &str = "/api/entries";

/// The remote system of record for entries.
///
/// Implementations report transport problems and non-success statuses as
/// [`TradebookError::RemoteUnavailable`] and unexpected bodies as
/// [`TradebookError::MalformedRemotePayload`].
#[async_trait]
pub trait EntryRemote: Send + Sync {
    /// Fetches the full ordered collection.
    async fn fetch_entries(&self) -> Result<Vec<Entry>>;

    /// Creates an entry from `draft` and returns the server's representation,
    /// which should carry the assigned `id` and `created_at`. Callers decide
    /// what to do with an answer that lacks them.
    async fn create_entry(&self, draft: &Entry) -> Result<Entry>;
}

#[async_trait]
impl<T: EntryRemote + ?Sized> EntryRemote for std::sync::Arc<T> {
    async fn fetch_entries(&self) -> Result<Vec<Entry>> {
        (**self).fetch_entries().await
    }

    async fn create_entry(&self, draft: &Entry) -> Result<Entry> {
        (**self).create_entry(draft).await
    }
}

/// [`EntryRemote`] over HTTP with JSON bodies.
pub struct HttpRemote {
    client: Client,
    endpoint: String,
}

impl HttpRemote {
    /// Builds a client for the API rooted at `base_url` (e.g. `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns [`TradebookError::RemoteUnavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TradebookError::RemoteUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), ENTRIES_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(TradebookError::RemoteUnavailable(format!(
            "server answered {status}"
        )));
    }
    let body = response
        .text()
        .await
        .map_err(|e| TradebookError::RemoteUnavailable(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| TradebookError::MalformedRemotePayload(e.to_string()))
}

#[async_trait]
impl EntryRemote for HttpRemote {
    async fn fetch_entries(&self) -> Result<Vec<Entry>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| TradebookError::RemoteUnavailable(e.to_string()))?;
        read_json(response).await
    }

    async fn create_entry(&self, draft: &Entry) -> Result<Entry> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&draft.as_draft())
            .send()
            .await
            .map_err(|e| TradebookError::RemoteUnavailable(e.to_string()))?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response and hands back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    fn remote(base: &str) -> HttpRemote {
        HttpRemote::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            remote("http://example.test/").endpoint(),
            "http://example.test/api/entries"
        );
        assert_eq!(
            remote("http://example.test").endpoint(),
            "http://example.test/api/entries"
        );
    }

    #[tokio::test]
    async fn test_fetch_entries_success() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"id":"1","date":"2024-01-02","instrument":"NQ","tags":["breakout"],"created_at":"2024-01-02T09:30:00Z"}]"#,
        )
        .await;

        let entries = remote(&base).fetch_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].instrument, "NQ");
        assert_eq!(entries[0].tags(), ["breakout"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/entries"));
    }

    #[tokio::test]
    async fn test_fetch_entries_server_error_is_unavailable() {
        let (base, _server) = serve_once("500 Internal Server Error", "{}").await;
        let err = remote(&base).fetch_entries().await.unwrap_err();
        assert!(matches!(err, TradebookError::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_entries_malformed_body() {
        let (base, _server) = serve_once("200 OK", r#"{"entries":"nope"}"#).await;
        let err = remote(&base).fetch_entries().await.unwrap_err();
        assert!(matches!(err, TradebookError::MalformedRemotePayload(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = remote(&format!("http://{addr}")).fetch_entries().await.unwrap_err();
        assert!(err.is_remote());
        assert!(matches!(err, TradebookError::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_create_entry_posts_draft_without_identity() {
        let (base, server) = serve_once(
            "201 Created",
            r#"{"id":"srv-7","date":"2024-05-05","instrument":"ES","created_at":"2024-05-05T12:00:00Z"}"#,
        )
        .await;

        let mut draft = Entry::blank();
        draft.instrument = "ES".to_string();
        draft.id = Some("stale".to_string());

        let saved = remote(&base).create_entry(&draft).await.unwrap();
        assert_eq!(saved.id.as_deref(), Some("srv-7"));
        assert!(saved.created_at.is_some());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/entries"));
        assert!(request.contains("\"instrument\":\"ES\""));
        assert!(!request.contains("stale"));
    }

    #[tokio::test]
    async fn test_create_entry_returns_partial_answer_as_is() {
        let (base, _server) = serve_once("200 OK", r#"{"instrument":"ES"}"#).await;
        let saved = remote(&base).create_entry(&Entry::blank()).await.unwrap();
        assert!(saved.id.is_none());
        assert_eq!(saved.instrument, "ES");
    }
}
