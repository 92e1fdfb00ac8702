//! Typed client for load balancers and their forwarding rules
//!
//! See [`api`] for the transport side and [`resource`] for the entities and
//! operations.

pub mod api;
pub mod config;
pub mod resource;

pub use api::auth::ApiCredentials;
pub use api::client::ApiClient;
pub use api::error::{Error, RemoteKind, Result};
pub use api::http::{format_api_error, HttpTransport};
pub use api::transport::{ApiRequest, ApiResponse, Transport};
pub use resource::{
    BalancingAlgorithm, BodyStyle, ForwardingRule, GenericInfo, HealthCheck, Links, ListOptions,
    LoadBalancer, LoadBalancerHandler, LoadBalancerReq, Meta, Ssl, StickyFlag, StickySessions,
};
