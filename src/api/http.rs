//! reqwest-backed [`Transport`] for the REST API

use super::auth::ApiCredentials;
use super::error::{Error, RemoteKind, Result};
use super::transport::{ApiRequest, ApiResponse, Transport};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.vultr.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP transport for API calls
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    credentials: ApiCredentials,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(base_url: &str, credentials: ApiCredentials, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::RequestBuild(format!("invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("lbkit/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(Error::transport)?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Absolute URL for a request
    ///
    /// Fails with `Error::RequestBuild` when resolution would rewrite the path,
    /// e.g. a `..` segment that climbs to a parent resource.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&request.path)
            .map_err(|e| Error::RequestBuild(format!("invalid path '{}': {}", request.path, e)))?;
        if url.path() != request.path {
            return Err(Error::RequestBuild(format!(
                "path '{}' resolves to '{}'",
                request.path,
                url.path()
            )));
        }
        if !request.query.is_empty() {
            url.set_query(Some(&request.query));
        }
        Ok(url)
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .bearer_auth(self.credentials.token())
            .header(ACCEPT, "application/json");

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
        }

        Ok(ApiResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        self.send(request).boxed()
    }
}

fn map_reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::transport(err)
    }
}

/// Format an API error for display
/// Security: Maps errors to short messages without echoing request details
pub fn format_api_error(error: &Error) -> String {
    match error {
        Error::Remote { status, message } => {
            let hint = match RemoteKind::from_status(*status) {
                RemoteKind::NotFound => "Resource not found.",
                RemoteKind::Unauthorized => {
                    "Authentication failed. Check LBKIT_API_KEY and the key's ACL."
                },
                RemoteKind::Validation => "Invalid request.",
                RemoteKind::Server => "Service temporarily unavailable. Please try again.",
                RemoteKind::Other if status.as_u16() == 429 => {
                    "Rate limit exceeded. Please try again later."
                },
                RemoteKind::Other => "Request failed.",
            };
            if message.is_empty() {
                hint.to_string()
            } else {
                format!("{} {}", hint, sanitize_for_log(message))
            }
        },
        Error::Timeout => "Request timed out. Check your network connection.".to_string(),
        Error::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        },
        Error::RequestBuild(msg) => format!("Could not build request: {}", msg),
        Error::Decode(_) => "Unexpected response from the API.".to_string(),
    }
}
