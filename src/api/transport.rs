//! Transport boundary
//!
//! The core never performs I/O itself. It hands fully built [`ApiRequest`]s to
//! a [`Transport`] and interprets the raw [`ApiResponse`] it gets back.

use super::error::Result;
use futures::future::BoxFuture;
use reqwest::{Method, StatusCode};

/// A request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API root, e.g. `/v2/load-balancers/lb-1`
    pub path: String,
    /// Encoded query string without the leading `?`; empty for none
    pub query: String,
    /// Serialized JSON body
    pub body: Option<String>,
}

impl ApiRequest {
    /// Path plus query string, as it appears on the wire
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Raw response as received from the server
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes requests against the remote API
///
/// Implementations handle connections, authentication and TLS. They must
/// return non-success statuses as a normal [`ApiResponse`]; only failures to
/// obtain a response at all are errors. Dropping the returned future cancels
/// the call.
pub trait Transport: Send + Sync {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        (**self).execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_query() {
        let mut request = ApiRequest {
            method: Method::GET,
            path: "/v2/load-balancers".to_string(),
            query: String::new(),
            body: None,
        };
        assert_eq!(request.path_and_query(), "/v2/load-balancers");

        request.query = "per_page=10".to_string();
        assert_eq!(request.path_and_query(), "/v2/load-balancers?per_page=10");
    }
}
