//! Expert agent health aggregation
//!
//! Probes the base address of every registered agent with a short timeout
//! and classifies each as healthy (2xx), degraded (any other status) or
//! unavailable (network failure). Probes are independent reads and run
//! concurrently. Aggregation never fails; every per-probe error is
//! absorbed into the `Unavailable` classification.

use crate::models::{AgentHealth, HealthReport};
use crate::registry::{base_url, AgentRegistry};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::warn;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct HealthAggregator {
    client: Client,
    registry: AgentRegistry,
}

impl HealthAggregator {
    pub fn new(registry: AgentRegistry) -> Self {
        let client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, registry }
    }

    /// Probe every registry entry and aggregate the results.
    pub async fn health(&self) -> HealthReport {
        let mut probes = JoinSet::new();

        for (name, endpoint) in self.registry.entries() {
            let client = self.client.clone();
            let name = name.to_string();
            let url = base_url(endpoint).to_string();

            probes.spawn(async move {
                let status = probe(&client, &name, &url).await;
                (name, status)
            });
        }

        let mut experts = HashMap::new();
        while let Some(joined) = probes.join_next().await {
            // A panicked probe task counts as unreachable.
            match joined {
                Ok((name, status)) => {
                    experts.insert(name, status);
                }
                Err(e) => warn!("Health probe task failed: {}", e),
            }
        }

        HealthReport::new(experts)
    }
}

async fn probe(client: &Client, name: &str, url: &str) -> AgentHealth {
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => AgentHealth::Healthy,
        Ok(response) => {
            warn!(agent = name, status = response.status().as_u16(), "Agent degraded");
            AgentHealth::Degraded
        }
        Err(e) => {
            warn!(agent = name, "Agent unreachable: {}", e);
            AgentHealth::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn all_agents_up_reports_healthy() {
        let router = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/order", get(|| async { "ok" }));
        let base = spawn(router).await;
        let registry = AgentRegistry::from_bases(&base, &base, &base, &base, &base);

        let report = HealthAggregator::new(registry).health().await;

        assert!(report.all_healthy);
        assert_eq!(report.experts.len(), 7);
        assert!(report
            .experts
            .values()
            .all(|h| *h == AgentHealth::Healthy));
    }

    #[tokio::test]
    async fn non_success_probe_is_degraded() {
        let router = Router::new()
            .route(
                "/",
                get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "nope") }),
            )
            .route(
                "/order",
                get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "nope") }),
            );
        let base = spawn(router).await;
        let registry = AgentRegistry::from_bases(&base, &base, &base, &base, &base);

        let report = HealthAggregator::new(registry).health().await;

        assert!(!report.all_healthy);
        assert!(report
            .experts
            .values()
            .all(|h| *h == AgentHealth::Degraded));
    }

    #[tokio::test]
    async fn unreachable_agent_is_unavailable_not_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let up = spawn(Router::new().route("/", get(|| async { "ok" }))).await;
        let registry = AgentRegistry::from_bases(&dead, &up, &up, &up, &up);

        let report = HealthAggregator::new(registry).health().await;

        assert!(!report.all_healthy);
        assert_eq!(report.experts["finance"], AgentHealth::Unavailable);
        assert_eq!(report.experts["chart"], AgentHealth::Healthy);
    }
}
