//! Forwarding rule operations
//!
//! Rules live under `/load-balancers/{id}/forwarding-rules`. There is no
//! in-place update: a rule is changed by deleting it and creating a new one.

use super::envelope::require;
use super::load_balancer::{next_options, LoadBalancerHandler};
use super::model::{ForwardingRule, Meta};
use super::path;
use super::query::ListOptions;
use crate::api::error::Result;
use crate::api::transport::Transport;
use reqwest::Method;

impl<T: Transport> LoadBalancerHandler<'_, T> {
    /// Create a forwarding rule on load balancer `id`
    /// The returned rule carries the server-assigned `id`.
    /// A response without a `forwarding_rule` object is an `Error::Decode`.
    pub async fn create_forwarding_rule(
        &self,
        id: &str,
        rule: &ForwardingRule,
    ) -> Result<ForwardingRule> {
        tracing::info!(
            "create forwarding rule: lb={}, {}:{} -> {}:{}",
            id,
            rule.frontend_protocol,
            rule.frontend_port,
            rule.backend_protocol,
            rule.backend_port
        );

        let request =
            self.client
                .new_request_with_body(Method::POST, &path::forwarding_rules(id), rule)?;
        require(self.client.execute_single(request).await?)
    }

    /// Get a forwarding rule
    ///
    /// Fails with `Error::Decode` when the response has no `forwarding_rule` object.
    pub async fn get_forwarding_rule(&self, id: &str, rule_id: &str) -> Result<ForwardingRule> {
        let request = self
            .client
            .new_request(Method::GET, &path::forwarding_rule(id, rule_id));
        require(self.client.execute_single(request).await?)
    }

    /// Delete a forwarding rule
    pub async fn delete_forwarding_rule(&self, id: &str, rule_id: &str) -> Result<()> {
        tracing::info!("delete forwarding rule: lb={}, rule={}", id, rule_id);

        let request = self
            .client
            .new_request(Method::DELETE, &path::forwarding_rule(id, rule_id));
        self.client.execute_unit(request).await
    }

    /// List one page of forwarding rules for load balancer `id`
    pub async fn list_forwarding_rules(
        &self,
        id: &str,
        options: &ListOptions,
    ) -> Result<(Vec<ForwardingRule>, Option<Meta>)> {
        let request = self
            .client
            .new_list_request(&path::forwarding_rules(id), options)?;
        let page = self.client.execute_list(request).await?;
        Ok((page.items, page.meta))
    }

    /// List every forwarding rule for load balancer `id`
    pub async fn list_all_forwarding_rules(
        &self,
        id: &str,
        options: &ListOptions,
    ) -> Result<Vec<ForwardingRule>> {
        let mut all_items = Vec::new();
        let mut options = options.clone();

        loop {
            let (items, meta) = self.list_forwarding_rules(id, &options).await?;
            all_items.extend(items);

            match next_options(&options, meta.as_ref()) {
                Some(next) => options = next,
                None => break,
            }
        }

        Ok(all_items)
    }
}
