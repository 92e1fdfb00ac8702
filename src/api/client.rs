//! API Client
//!
//! Builds requests against the versioned API root, hands them to a
//! [`Transport`], and turns the raw responses into envelopes or errors.
//! The client holds no mutable state and can be shared freely.

use super::error::{Error, Result};
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::resource::envelope::{self, BodyStyle, Enveloped, ListEnvelope};
use crate::resource::query::encode_query;
use crate::resource::LoadBalancerHandler;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Versioned root every resource path is mounted under
pub const API_ROOT: &str = "/v2";

/// Main API client
#[derive(Clone)]
pub struct ApiClient<T> {
    transport: T,
    body_style: BodyStyle,
}

impl<T: Transport> ApiClient<T> {
    /// Create a new client over `transport`
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            body_style: BodyStyle::default(),
        }
    }

    /// Change how request bodies are wrapped
    pub fn with_body_style(mut self, body_style: BodyStyle) -> Self {
        self.body_style = body_style;
        self
    }

    pub fn body_style(&self) -> BodyStyle {
        self.body_style
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Load balancer operations
    pub fn load_balancers(&self) -> LoadBalancerHandler<'_, T> {
        LoadBalancerHandler::new(self)
    }

    /// Build the full API path for a resource path
    pub fn api_path(&self, path: &str) -> String {
        format!("{}{}", API_ROOT, path)
    }

    /// Build a request without a body
    pub fn new_request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest {
            method,
            path: self.api_path(path),
            query: String::new(),
            body: None,
        }
    }

    /// Build a request carrying `body` in the configured [`BodyStyle`]
    pub fn new_request_with_body<B>(&self, method: Method, path: &str, body: &B) -> Result<ApiRequest>
    where
        B: Enveloped + Serialize,
    {
        let mut request = self.new_request(method, path);
        request.body = Some(envelope::encode_body(body, self.body_style)?);
        Ok(request)
    }

    /// Build a listing request with `options` encoded into the query string
    pub fn new_list_request<Q>(&self, path: &str, options: &Q) -> Result<ApiRequest>
    where
        Q: Serialize + ?Sized,
    {
        let mut request = self.new_request(Method::GET, path);
        request.query = encode_query(options)?;
        Ok(request)
    }

    /// Send a request exactly once; non-success statuses become [`Error::Remote`]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method.clone();
        let target = request.path_and_query();

        let response = self.transport.execute(request).await?;

        if !response.status.is_success() {
            tracing::debug!("{} {} -> {}", method, target, response.status);
            return Err(Error::Remote {
                status: response.status,
                message: remote_message(&response.body),
            });
        }

        tracing::trace!("{} {} -> {}", method, target, response.status);
        Ok(response)
    }

    /// Execute and unwrap a single entity envelope
    pub async fn execute_single<R>(&self, request: ApiRequest) -> Result<Option<R>>
    where
        R: Enveloped + DeserializeOwned,
    {
        let response = self.execute(request).await?;
        envelope::decode_single(&response.body)
    }

    /// Execute and unwrap a listing envelope
    pub async fn execute_list<R>(&self, request: ApiRequest) -> Result<ListEnvelope<R>>
    where
        R: Enveloped + DeserializeOwned,
    {
        let response = self.execute(request).await?;
        envelope::decode_list(&response.body)
    }

    /// Execute and discard whatever body comes back
    pub async fn execute_unit(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }
}

/// Extract the server's message from an error body
/// The API answers `{"error": "...", "status": 404}`; anything else is kept as is
fn remote_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        let error = value.get("error")?;
        error
            .as_str()
            .or_else(|| error.get("message").and_then(Value::as_str))
    });

    message
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::model::LoadBalancerReq;
    use crate::resource::query::ListOptions;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use reqwest::StatusCode;

    struct Fixed(StatusCode, &'static str);

    impl Transport for Fixed {
        fn execute(&self, _request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
            let response = ApiResponse::new(self.0, self.1);
            async move { Ok::<_, Error>(response) }.boxed()
        }
    }

    #[test]
    fn test_api_path_is_versioned() {
        let client = ApiClient::new(Fixed(StatusCode::OK, ""));
        assert_eq!(client.api_path("/load-balancers"), "/v2/load-balancers");
    }

    #[test]
    fn test_new_request_with_body_respects_style() {
        let req = LoadBalancerReq {
            label: Some("web".to_string()),
            ..Default::default()
        };

        let client = ApiClient::new(Fixed(StatusCode::OK, ""));
        let request = client
            .new_request_with_body(Method::POST, "/load-balancers", &req)
            .unwrap();
        assert_eq!(request.path, "/v2/load-balancers");
        assert!(request.body.unwrap().starts_with(r#"{"load_balancer":"#));

        let client = client.with_body_style(BodyStyle::Bare);
        let request = client
            .new_request_with_body(Method::PATCH, "/load-balancers/x", &req)
            .unwrap();
        assert!(request.body.unwrap().starts_with(r#"{"label":"web""#));
    }

    #[test]
    fn test_new_list_request_encodes_query() {
        let client = ApiClient::new(Fixed(StatusCode::OK, ""));
        let request = client
            .new_list_request("/load-balancers", &ListOptions::new().per_page(5))
            .unwrap();
        assert_eq!(request.path_and_query(), "/v2/load-balancers?per_page=5");
    }

    #[test]
    fn test_remote_message_variants() {
        assert_eq!(
            remote_message(r#"{"error": "Invalid load balancer ID", "status": 404}"#),
            "Invalid load balancer ID"
        );
        assert_eq!(
            remote_message(r#"{"error": {"code": 400, "message": "bad port"}}"#),
            "bad port"
        );
        assert_eq!(remote_message("  gateway timeout \n"), "gateway timeout");
    }

    #[test]
    fn test_execute_maps_status_to_remote_error() {
        let client = ApiClient::new(Fixed(
            StatusCode::NOT_FOUND,
            r#"{"error": "Invalid load balancer ID", "status": 404}"#,
        ));
        let request = client.new_request(Method::GET, "/load-balancers/missing");
        let err = tokio_test::block_on(client.execute(request)).unwrap_err();

        assert!(err.is_not_found());
        match err {
            Error::Remote { message, .. } => assert_eq!(message, "Invalid load balancer ID"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_execute_unit_ignores_body() {
        let client = ApiClient::new(Fixed(StatusCode::OK, "not json at all"));
        let request = client.new_request(Method::DELETE, "/load-balancers/lb-1");
        assert!(tokio_test::block_on(client.execute_unit(request)).is_ok());
    }
}
