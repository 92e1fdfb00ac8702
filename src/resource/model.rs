//! Load balancer domain types
//!
//! Read models (`LoadBalancer`, `GenericInfo`) tolerate missing or `null` fields.
//! Write models skip every unset optional field so a partial update never
//! clears server-side configuration by accident.

use super::envelope::Enveloped;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A load balancer as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_created: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    /// Provisioning status, e.g. `active` or `pending`; not interpreted here
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ipv4: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ipv6: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instances: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_info: Option<GenericInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub has_ssl: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub forwarding_rules: Vec<ForwardingRule>,
}

impl LoadBalancer {
    /// Creation time, if the server sent a valid RFC 3339 timestamp
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date_created).ok()
    }
}

impl Enveloped for LoadBalancer {
    const SINGULAR: &'static str = "load_balancer";
    const PLURAL: &'static str = "load_balancers";
}

/// Options for creating or updating a load balancer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadBalancerReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Always sent; an empty list detaches every instance
    pub instances: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(rename = "sticky_session", skip_serializing_if = "Option::is_none")]
    pub sticky_sessions: Option<StickySessions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarding_rules: Option<Vec<ForwardingRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<Ssl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_redirect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_protocol: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balancing_algorithm: Option<BalancingAlgorithm>,
}

impl Enveloped for LoadBalancerReq {
    const SINGULAR: &'static str = LoadBalancer::SINGULAR;
    const PLURAL: &'static str = LoadBalancer::PLURAL;
}

/// Health check configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Seconds between checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_interval: Option<u32>,
    /// Seconds to wait for a response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthy_threshold: Option<u32>,
}

/// Effective configuration resolved by the server; read-only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balancing_algorithm: Option<BalancingAlgorithm>,
    #[serde(deserialize_with = "null_as_default")]
    pub ssl_redirect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky_sessions: Option<StickySessions>,
    #[serde(deserialize_with = "null_as_default")]
    pub proxy_protocol: String,
}

/// Cookie based session affinity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickySessions {
    #[serde(rename = "sticky_sessions", default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<StickyFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
}

impl StickySessions {
    /// Enabled sticky sessions using `cookie_name`
    pub fn cookie(cookie_name: impl Into<String>) -> Self {
        Self {
            enabled: Some(StickyFlag::On),
            cookie_name: Some(cookie_name.into()),
        }
    }
}

/// Sticky session switch, carried as `"on"` / `"off"`; other values are kept as sent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StickyFlag {
    On,
    Off,
    Other(String),
}

impl StickyFlag {
    pub fn as_str(&self) -> &str {
        match self {
            StickyFlag::On => "on",
            StickyFlag::Off => "off",
            StickyFlag::Other(s) => s,
        }
    }

    /// `Some(true)` for on, `Some(false)` for off, `None` when the server sent something else
    pub fn is_enabled(&self) -> Option<bool> {
        match self {
            StickyFlag::On => Some(true),
            StickyFlag::Off => Some(false),
            StickyFlag::Other(_) => None,
        }
    }
}

impl From<String> for StickyFlag {
    fn from(value: String) -> Self {
        match value.as_str() {
            "on" => StickyFlag::On,
            "off" => StickyFlag::Off,
            _ => StickyFlag::Other(value),
        }
    }
}

impl From<StickyFlag> for String {
    fn from(value: StickyFlag) -> Self {
        value.as_str().to_string()
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Certificate bundle for SSL termination; never returned by reads
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ssl {
    #[serde(rename = "ssl_private_key")]
    pub private_key: String,
    #[serde(rename = "ssl_certificate")]
    pub certificate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

// Security: private keys must not end up in logs
impl fmt::Debug for Ssl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ssl")
            .field("private_key", &"<redacted>")
            .field("certificate", &format_args!("<{} bytes>", self.certificate.len()))
            .field("chain", &self.chain.as_ref().map(|c| c.len()))
            .finish()
    }
}

/// A frontend to backend port/protocol mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardingRule {
    /// Assigned by the server; leave unset when creating a rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub frontend_protocol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub frontend_port: u16,
    #[serde(deserialize_with = "null_as_default")]
    pub backend_protocol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub backend_port: u16,
}

impl ForwardingRule {
    pub fn new(
        frontend_protocol: impl Into<String>,
        frontend_port: u16,
        backend_protocol: impl Into<String>,
        backend_port: u16,
    ) -> Self {
        Self {
            id: None,
            frontend_protocol: frontend_protocol.into(),
            frontend_port,
            backend_protocol: backend_protocol.into(),
            backend_port,
        }
    }
}

impl Enveloped for ForwardingRule {
    const SINGULAR: &'static str = "forwarding_rule";
    const PLURAL: &'static str = "forwarding_rules";
}

/// Balancing algorithm; unknown values from the server are preserved
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BalancingAlgorithm {
    RoundRobin,
    LeastConn,
    Other(String),
}

impl BalancingAlgorithm {
    pub fn as_str(&self) -> &str {
        match self {
            BalancingAlgorithm::RoundRobin => "roundrobin",
            BalancingAlgorithm::LeastConn => "leastconn",
            BalancingAlgorithm::Other(s) => s,
        }
    }
}

impl From<String> for BalancingAlgorithm {
    fn from(value: String) -> Self {
        match value.as_str() {
            "roundrobin" => BalancingAlgorithm::RoundRobin,
            "leastconn" => BalancingAlgorithm::LeastConn,
            _ => BalancingAlgorithm::Other(value),
        }
    }
}

impl From<BalancingAlgorithm> for String {
    fn from(value: BalancingAlgorithm) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BalancingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination metadata returned with every listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Links,
}

/// Navigation cursors; empty strings mean "no page"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(deserialize_with = "null_as_default")]
    pub next: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prev: String,
}

impl Meta {
    /// Cursor for the following page, if any
    pub fn next_cursor(&self) -> Option<&str> {
        Some(self.links.next.as_str()).filter(|c| !c.is_empty())
    }

    pub fn prev_cursor(&self) -> Option<&str> {
        Some(self.links.prev.as_str()).filter(|c| !c.is_empty())
    }
}
