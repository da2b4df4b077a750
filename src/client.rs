use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{BACKEND_REQUESTS, BACKEND_REQUEST_DURATION, BACKEND_REQUEST_ERRORS};
use crate::types::{ChatRequest, ChatResponse};

/// Backend used when neither a flag nor the environment names one.
pub const DEFAULT_BACKEND_URL: &str = "https://chharomentalhealthchatbot.onrender.com";
/// Environment variable consulted for the backend base URL.
pub const BACKEND_URL_ENV: &str = "CHHARO_BACKEND_URL";
/// Default bound on a single request to the backend.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The HTTP contract the chat client consumes.
///
/// [`Backend`] is the real implementation; tests substitute scripted ones.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Probe `GET /health`.  Any JSON body counts as healthy.
    async fn health(&self) -> Result<serde_json::Value>;

    /// Send one user turn with `POST /chat`.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Client for the support-chat backend.
#[derive(Debug, Clone)]
pub struct Backend {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl Backend {
    /// Create a backend client.
    ///
    /// The base URL can be provided directly or read from the
    /// `CHHARO_BACKEND_URL` environment variable; otherwise the built-in
    /// default is used.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a backend client with a custom timeout.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var(BACKEND_URL_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
        };
        let base_url = normalize_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::validation(
                "timeout must be greater than zero",
                Some("timeout".to_string()),
            ));
        }
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The normalized base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Convert a non-success response into an [`Error`].
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        let body = match response.text().await {
            Ok(body) if body.trim().is_empty() => format!("status {status_code}"),
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        match status_code {
            400 | 422 => Error::bad_request(body),
            404 => Error::not_found(body),
            408 => Error::timeout(body, None),
            500 => Error::internal_server(body),
            502..=504 => Error::service_unavailable(body, retry_after),
            _ => Error::api(status_code, body),
        }
    }

    /// Send a request without looking at the response status.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        BACKEND_REQUESTS.click();
        let start = Instant::now();
        let result = request.headers(Self::default_headers()).send().await;
        BACKEND_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        result.map_err(|e| {
            BACKEND_REQUEST_ERRORS.click();
            self.map_send_error(e)
        })
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = self.send(request).await?;
        if !response.status().is_success() {
            BACKEND_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl ChatBackend for Backend {
    /// Any JSON body counts as reachable, whatever the status.
    async fn health(&self) -> Result<serde_json::Value> {
        let url = self.endpoint("health")?;
        tracing::debug!(%url, "probing backend health");
        let response = self.send(self.client.get(url)).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, "health probe returned non-success status");
        }
        response.json::<serde_json::Value>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse health response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint("chat")?;
        tracing::debug!(%url, session_id = %request.session_id, "sending chat turn");
        let response = self.execute(self.client.post(url).json(request)).await?;
        response.json::<ChatResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse chat response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

/// Parse a backend base URL and make sure relative joins land beneath it.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::validation(
            "backend URL must not be empty",
            Some("backend_url".to_string()),
        ));
    }
    let mut url = Url::parse(raw)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::validation(
            format!("unsupported backend URL scheme: {}", url.scheme()),
            Some("backend_url".to_string()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
