//! API interaction module
//!
//! This module provides everything between the typed resource layer and the
//! network: the transport boundary, the reqwest transport, authentication,
//! request building, and error classification.
//!
//! # Module Structure
//!
//! - [`auth`] - API key credentials
//! - [`client`] - Request building, execution and envelope decoding
//! - [`error`] - Error taxonomy
//! - [`http`] - reqwest-backed transport
//! - [`transport`] - The [`Transport`](transport::Transport) trait
//!
//! # Example
//!
//! ```ignore
//! use lbkit::api::{auth::ApiCredentials, client::ApiClient, http::HttpTransport};
//!
//! async fn example() -> lbkit::Result<()> {
//!     let transport = HttpTransport::new(
//!         "https://api.vultr.com",
//!         ApiCredentials::new("key"),
//!         std::time::Duration::from_secs(30),
//!     )?;
//!     let client = ApiClient::new(transport);
//!     let lb = client.load_balancers().get("lb-123").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
