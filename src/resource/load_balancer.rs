//! Load balancer operations

use super::envelope::require;
use super::model::{LoadBalancer, LoadBalancerReq, Meta};
use super::path;
use super::query::ListOptions;
use crate::api::client::ApiClient;
use crate::api::error::Result;
use crate::api::transport::Transport;
use reqwest::Method;

/// Operations on `/load-balancers` and its nested forwarding rules
///
/// Every call is a single request/response exchange with no retries and no
/// local state, so handlers can be created and used concurrently.
pub struct LoadBalancerHandler<'a, T> {
    pub(super) client: &'a ApiClient<T>,
}

impl<'a, T: Transport> LoadBalancerHandler<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Create a load balancer
    ///
    /// A response without a `load_balancer` object is an `Error::Decode`,
    /// not an absent value.
    pub async fn create(&self, create_req: &LoadBalancerReq) -> Result<LoadBalancer> {
        tracing::info!(
            "create load balancer: region={:?}, label={:?}",
            create_req.region,
            create_req.label
        );

        let request =
            self.client
                .new_request_with_body(Method::POST, &path::load_balancers(), create_req)?;
        require(self.client.execute_single(request).await?)
    }

    /// Get a load balancer
    ///
    /// Fails with `Error::Decode` when the response has no `load_balancer` object.
    pub async fn get(&self, id: &str) -> Result<LoadBalancer> {
        let request = self.client.new_request(Method::GET, &path::load_balancer(id));
        require(self.client.execute_single(request).await?)
    }

    /// Update a load balancer
    ///
    /// Only fields set on `update_req` are sent. The response body is
    /// ignored; call [`get`](Self::get) to see the server-resolved state.
    pub async fn update(&self, id: &str, update_req: &LoadBalancerReq) -> Result<()> {
        tracing::info!("update load balancer: id={}", id);

        let request =
            self.client
                .new_request_with_body(Method::PATCH, &path::load_balancer(id), update_req)?;
        self.client.execute_unit(request).await
    }

    /// Delete a load balancer
    /// Not idempotent: a second delete surfaces the server's error
    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("delete load balancer: id={}", id);

        let request = self.client.new_request(Method::DELETE, &path::load_balancer(id));
        self.client.execute_unit(request).await
    }

    /// List one page of load balancers in server order
    pub async fn list(&self, options: &ListOptions) -> Result<(Vec<LoadBalancer>, Option<Meta>)> {
        let request = self.client.new_list_request(&path::load_balancers(), options)?;
        let page = self.client.execute_list(request).await?;
        Ok((page.items, page.meta))
    }

    /// List every load balancer, following `meta.links.next` until exhausted
    pub async fn list_all(&self, options: &ListOptions) -> Result<Vec<LoadBalancer>> {
        let mut all_items = Vec::new();
        let mut options = options.clone();

        loop {
            let (items, meta) = self.list(&options).await?;
            all_items.extend(items);

            match next_options(&options, meta.as_ref()) {
                Some(next) => options = next,
                None => break,
            }
        }

        Ok(all_items)
    }
}

/// Continuation options, or `None` when there is no further page
/// A cursor that repeats the current one ends the walk
pub(super) fn next_options(current: &ListOptions, meta: Option<&Meta>) -> Option<ListOptions> {
    let next = current.next_page(meta?)?;
    if next.cursor == current.cursor {
        tracing::warn!("server returned the same cursor twice, stopping pagination");
        return None;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::Error;
    use crate::api::transport::{ApiRequest, ApiResponse};
    use crate::resource::model::Links;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every request and answers with a canned response
    struct Recorder {
        requests: Mutex<Vec<ApiRequest>>,
        status: StatusCode,
        body: String,
    }

    impl Recorder {
        fn new(status: StatusCode, body: serde_json::Value) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                status,
                body: body.to_string(),
            }
        }

        fn last(&self) -> ApiRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
            self.requests.lock().unwrap().push(request);
            let response = ApiResponse::new(self.status, self.body.clone());
            async move { Ok::<_, Error>(response) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_get_uses_single_resource_path() {
        let client = ApiClient::new(Recorder::new(
            StatusCode::OK,
            json!({"load_balancer": {"id": "lb-123", "status": "active"}}),
        ));

        let lb = client.load_balancers().get("lb-123").await.unwrap();
        assert_eq!(lb.id, "lb-123");
        assert_eq!(lb.status, "active");

        let request = client.transport().last();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/v2/load-balancers/lb-123");
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_create_without_envelope_is_decode_error() {
        let client = ApiClient::new(Recorder::new(StatusCode::CREATED, json!({})));
        let err = client
            .load_balancers()
            .create(&LoadBalancerReq::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_update_sends_patch_and_ignores_body() {
        let client = ApiClient::new(Recorder::new(StatusCode::NO_CONTENT, json!(null)));
        let update = LoadBalancerReq {
            label: Some("renamed".to_string()),
            ..Default::default()
        };

        client.load_balancers().update("lb-1", &update).await.unwrap();

        let request = client.transport().last();
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.path, "/v2/load-balancers/lb-1");
        let body: serde_json::Value = serde_json::from_str(&request.body.unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"load_balancer": {"label": "renamed", "instances": []}})
        );
    }

    #[test]
    fn test_next_options_stops_on_repeated_cursor() {
        let current = ListOptions::new().cursor("same");
        let meta = Meta {
            total: 10,
            links: Links {
                next: "same".to_string(),
                prev: String::new(),
            },
        };
        assert!(next_options(&current, Some(&meta)).is_none());
        assert!(next_options(&current, None).is_none());
    }
}
