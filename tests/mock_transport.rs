//! Behaviour tests against an in-memory transport
//!
//! The fake server keeps load balancers in a map and answers with the same
//! envelopes as the real API, adding latency to interleave concurrent calls.

use futures::future::BoxFuture;
use futures::FutureExt;
use lbkit::{
    ApiClient, ApiRequest, ApiResponse, Error, LoadBalancerReq, RemoteKind, Transport,
};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeServer {
    load_balancers: Mutex<BTreeMap<String, Value>>,
    requests: Mutex<Vec<ApiRequest>>,
    next_id: AtomicUsize,
    latency: Duration,
}

impl FakeServer {
    fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    fn not_found() -> ApiResponse {
        ApiResponse::new(
            StatusCode::NOT_FOUND,
            json!({"error": "Invalid load balancer ID", "status": 404}).to_string(),
        )
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let id = request.path.strip_prefix("/v2/load-balancers/").map(str::to_string);

        match (&request.method, id) {
            (&Method::POST, None) => {
                let body: Value = serde_json::from_str(request.body.as_deref().unwrap_or("{}")).unwrap();
                let req = &body["load_balancer"];
                let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                let id = format!("lb-{}", n);
                let lb = json!({
                    "id": id,
                    "region": req["region"],
                    "label": req["label"],
                    "status": "pending",
                    "instances": req["instances"],
                });
                self.load_balancers.lock().unwrap().insert(id, lb.clone());
                ApiResponse::new(StatusCode::CREATED, json!({"load_balancer": lb}).to_string())
            },
            (&Method::GET, Some(id)) => match self.load_balancers.lock().unwrap().get(&id) {
                Some(lb) => ApiResponse::new(StatusCode::OK, json!({"load_balancer": lb}).to_string()),
                None => Self::not_found(),
            },
            (&Method::DELETE, Some(id)) => match self.load_balancers.lock().unwrap().remove(&id) {
                Some(_) => ApiResponse::new(StatusCode::NO_CONTENT, ""),
                None => Self::not_found(),
            },
            (&Method::GET, None) => {
                let items: Vec<Value> = self.load_balancers.lock().unwrap().values().cloned().collect();
                let total = items.len();
                ApiResponse::new(
                    StatusCode::OK,
                    json!({
                        "load_balancers": items,
                        "meta": {"total": total, "links": {"next": "", "prev": ""}}
                    })
                    .to_string(),
                )
            },
            _ => ApiResponse::new(StatusCode::METHOD_NOT_ALLOWED, ""),
        }
    }
}

impl Transport for FakeServer {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'_, lbkit::Result<ApiResponse>> {
        async move {
            self.requests.lock().unwrap().push(request.clone());
            tokio::time::sleep(self.latency).await;
            Ok::<_, Error>(self.handle(&request))
        }
        .boxed()
    }
}

fn req(region: &str, label: &str, instances: &[&str]) -> LoadBalancerReq {
    LoadBalancerReq {
        region: Some(region.to_string()),
        label: Some(label.to_string()),
        instances: instances.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_then_get_returns_settable_fields() {
    let client = ApiClient::new(FakeServer::default());
    let lbs = client.load_balancers();

    let created = lbs.create(&req("ewr", "web", &["i-1", "i-2"])).await.unwrap();
    let fetched = lbs.get(&created.id).await.unwrap();

    assert_eq!(fetched.region, "ewr");
    assert_eq!(fetched.label, "web");
    assert_eq!(fetched.instances, vec!["i-1", "i-2"]);
    assert_eq!(fetched.status, "pending");
}

#[tokio::test]
async fn test_delete_nonexistent_is_not_found() {
    let client = ApiClient::new(FakeServer::default());

    let err = client.load_balancers().delete("nope").await.unwrap_err();
    assert_eq!(err.remote_kind(), Some(RemoteKind::NotFound));
    assert!(matches!(err, Error::Remote { .. }));
}

#[tokio::test]
async fn test_concurrent_creates_do_not_mix_bodies() {
    let server = Arc::new(FakeServer::with_latency(Duration::from_millis(50)));
    let client = ApiClient::new(server.clone());
    let lbs = client.load_balancers();

    let first = req("ewr", "alpha", &["i-a"]);
    let second = req("ams", "beta", &["i-b1", "i-b2"]);

    let (a, b) = tokio::join!(lbs.create(&first), lbs.create(&second));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.id, b.id);
    assert_eq!((a.region.as_str(), a.label.as_str()), ("ewr", "alpha"));
    assert_eq!(a.instances, vec!["i-a"]);
    assert_eq!((b.region.as_str(), b.label.as_str()), ("ams", "beta"));
    assert_eq!(b.instances, vec!["i-b1", "i-b2"]);

    let requests = server.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let labels: Vec<String> = requests
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_str(r.body.as_deref().unwrap()).unwrap();
            body["load_balancer"]["label"].as_str().unwrap().to_string()
        })
        .collect();
    assert!(labels.contains(&"alpha".to_string()));
    assert!(labels.contains(&"beta".to_string()));
}

#[tokio::test]
async fn test_spawned_calls_share_one_client() {
    let client = Arc::new(ApiClient::new(FakeServer::with_latency(Duration::from_millis(10))));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .load_balancers()
                    .create(&req("ewr", &format!("lb-{}", i), &[]))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let (items, meta) = client
        .load_balancers()
        .list(&Default::default())
        .await
        .unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(meta.unwrap().total, 4);
}

#[tokio::test]
async fn test_dropped_call_leaves_no_state() {
    let server = Arc::new(FakeServer::with_latency(Duration::from_secs(5)));
    let client = ApiClient::new(server.clone());

    let result = tokio::time::timeout(
        Duration::from_millis(20),
        client.load_balancers().create(&req("ewr", "slow", &[])),
    )
    .await;

    assert!(result.is_err(), "call should have been cancelled");
    assert!(server.load_balancers.lock().unwrap().is_empty());
}
