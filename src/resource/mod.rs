//! Load balancer resources
//!
//! This module maps the load balancer API onto typed Rust values: paths,
//! query strings, JSON envelopes, and the operations built on top of them.
//!
//! # Architecture
//!
//! - [`path`] - Canonical paths for load balancers and their forwarding rules
//! - [`query`] - Deterministic query string encoding for listings
//! - [`envelope`] - Singular/plural JSON envelopes shared by every entity
//! - [`model`] - Domain entities and write models
//! - `load_balancer` / `forwarding_rule` - [`LoadBalancerHandler`] operations over an API client
//!
//! # Example
//!
//! ```ignore
//! use lbkit::{ApiClient, ForwardingRule, ListOptions};
//!
//! async fn example(client: &ApiClient<lbkit::HttpTransport>) -> lbkit::Result<()> {
//!     let lbs = client.load_balancers();
//!     let (page, meta) = lbs.list(&ListOptions::new().per_page(25)).await?;
//!     for lb in &page {
//!         lbs.create_forwarding_rule(&lb.id, &ForwardingRule::new("http", 80, "http", 8080)).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod envelope;
mod forwarding_rule;
mod load_balancer;
pub mod model;
pub mod path;
pub mod query;

pub use envelope::{BodyStyle, Enveloped, Envelope, ListEnvelope};
pub use load_balancer::LoadBalancerHandler;
pub use model::*;
pub use query::{encode_query, ListOptions};
