//! HTTP client utilities for the Mart storefront REST API.
//!
//! Provides a small builder API over `reqwest` with JSON handling, bearer
//! credentials and error classification.
//!
//! # Example
//!
//! ```rust,ignore
//! use mart_data::{Credentials, FetchClient, TimeoutConfig};
//!
//! let client = FetchClient::new(TimeoutConfig::default())?
//!     .with_base_url("https://api.example.in/api")
//!     .with_credentials(Credentials::with_token("token"));
//!
//! // Simple GET request
//! let brands: serde_json::Value = client
//!     .get("/brands/")
//!     .anonymous()
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//!
//! // POST with JSON body
//! let cart: serde_json::Value = client
//!     .post("/cart/add/")
//!     .json(&serde_json::json!({"product_id": 7, "quantity": 12}))?
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```
//!
//! A 401 or 403 answer to a request that carried a credential clears that
//! credential and yields [`FetchError::Unauthorized`]; callers never see the
//! raw response.

mod credentials;
mod error;
mod request;
mod response;
mod timeout;

pub use credentials::{Credentials, TOKEN_KEY};
pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use timeout::TimeoutConfig;

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the storefront API.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    credentials: Credentials,
}

impl FetchClient {
    /// Create a new HTTP client with the given timeouts.
    pub fn new(timeouts: TimeoutConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.total)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        let mut default_headers = HashMap::new();
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        Ok(Self {
            http,
            base_url: None,
            default_headers,
            credentials: Credentials::new(),
        })
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Use `credentials` for bearer authorization.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// The credentials attached to authenticated requests.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Base URL, if configured.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Put, url)
    }

    /// Create a PATCH request.
    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Patch, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let full_url = self.resolve(&url.into());

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }

    fn resolve(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url.to_string(),
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl<'a> ClientRequestBuilder<'a> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Override the client-wide timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Send without the bearer credential (public catalog reads).
    pub fn anonymous(mut self) -> Self {
        self.builder = self.builder.anonymous();
        self
    }

    /// Inspect the request that would be sent.
    pub fn as_request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and return the buffered response.
    ///
    /// Non-2xx statuses other than 401/403 are returned as a normal
    /// [`Response`]; use [`Response::error_for_status`] to turn them into errors.
    pub async fn send(self) -> Result<Response, FetchError> {
        let ClientRequestBuilder { client, builder } = self;

        let mut request = client.http.request(builder.method.into(), &builder.url);
        for (key, value) in &builder.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if !builder.query.is_empty() {
            request = request.query(&builder.query);
        }
        if let Some(timeout) = builder.timeout {
            request = request.timeout(timeout);
        }
        let token = if builder.anonymous {
            None
        } else {
            client.credentials.token()
        };
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = builder.body {
            request = request.body(body);
        }

        debug!(method = builder.method.as_str(), url = %builder.url, "sending request");
        let response = request.send().await?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?.to_vec();
        debug!(status, url = %builder.url, bytes = body.len(), "received response");

        if status == 401 || status == 403 {
            if token.is_some() {
                warn!(status, url = %builder.url, "credential rejected; clearing session");
                client.credentials.clear();
            }
            return Err(FetchError::Unauthorized { status });
        }

        Ok(Response::new(status, headers, body))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Credentials, FetchClient, FetchError, Method, Response, TimeoutConfig};
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve exactly one canned HTTP response; yields the raw request text.
    async fn serve_once(response: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                read += n;
                if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let _ = tx.send(String::from_utf8_lossy(&buf[..read]).to_string());
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        (format!("http://{}", addr), rx)
    }

    fn client(base: &str) -> FetchClient {
        FetchClient::new(TimeoutConfig::new(
            Duration::from_secs(2),
            Duration::from_secs(5),
        ))
        .unwrap()
        .with_base_url(base)
    }

    #[test]
    fn test_url_resolution() {
        let c = client("https://api.example.in/api/");
        assert_eq!(
            c.get("/cart/").as_request().url(),
            "https://api.example.in/api/cart/"
        );
        assert_eq!(
            c.get("products/").as_request().url(),
            "https://api.example.in/api/products/"
        );
        assert_eq!(
            c.get("http://other/x").as_request().url(),
            "http://other/x"
        );
    }

    #[tokio::test]
    async fn test_bearer_attached_when_present() {
        let (base, request) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}").await;
        let c = client(&base).with_credentials(Credentials::with_token("tok-7"));

        let resp = c.get("/cart/").send().await.unwrap();
        assert!(resp.is_success());

        let raw = request.await.unwrap().to_lowercase();
        assert!(raw.contains("authorization: bearer tok-7"));
    }

    #[tokio::test]
    async fn test_anonymous_skips_bearer() {
        let (base, request) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n[]").await;
        let c = client(&base).with_credentials(Credentials::with_token("tok-7"));

        c.get("/brands/").anonymous().send().await.unwrap();

        let raw = request.await.unwrap().to_lowercase();
        assert!(!raw.contains("authorization"));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_credentials() {
        let (base, _request) =
            serve_once("HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\n\r\n").await;
        let creds = Credentials::with_token("expired");
        let c = client(&base).with_credentials(creds.clone());

        let err = c.get("/cart/").send().await.unwrap_err();
        assert!(err.is_auth());
        assert!(!creds.is_authenticated());
    }

    #[tokio::test]
    async fn test_http_error_passes_through() {
        let (base, _request) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: 31\r\n\r\n{\"error\": \"Product not found\"}\n",
        )
        .await;
        let resp = client(&base).post("/cart/add/").send().await.unwrap();
        assert_eq!(resp.status, 404);
        let err = resp.error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr))
            .get("/cart/")
            .send()
            .await
            .unwrap_err();
        assert!(err.is_transient(), "expected transient error, got {err:?}");
    }

    #[tokio::test]
    async fn test_timeout_is_transient() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold the connection without answering.
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = client(&format!("http://{}", addr))
            .get("/cart/")
            .timeout(Duration::from_millis(200))
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout), "got {err:?}");
    }
}
