//! Expert agent registry
//!
//! Static mapping from intent to expert agent endpoint, built once at
//! startup and passed explicitly to the dispatcher and health aggregator.
//! Defaults point at the Docker internal network; every address can be
//! overridden through the environment so tests can substitute local mocks.

use std::env;

/// Endpoint URLs for every expert agent. Immutable for the process
/// lifetime once constructed.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    pub finance: String,
    pub chart: String,
    pub portfolio: String,
    pub comparison: String,
    pub market_order: String,
    pub limit_order: String,
    pub market_status: String,
}

impl AgentRegistry {
    /// Build the registry from environment variables, falling back to the
    /// Docker-network service addresses. The ordering service hosts the
    /// market-order, limit-order and market-status routes.
    pub fn from_env() -> Self {
        let finance_base = base_from_env("FINANCE_AGENT_URL", "http://agent-01:80");
        let chart_base = base_from_env("CHART_AGENT_URL", "http://stock-chart-agent:80");
        let portfolio_base = base_from_env("PORTFOLIO_AGENT_URL", "http://alpaca-account:80");
        let comparison_base = base_from_env("COMPARISON_AGENT_URL", "http://stock-comparison:80");
        let ordering_base = base_from_env("ORDERING_AGENT_URL", "http://stock-ordering:80");

        Self::from_bases(
            &finance_base,
            &chart_base,
            &portfolio_base,
            &comparison_base,
            &ordering_base,
        )
    }

    /// Build a registry from five service base addresses. Used by
    /// `from_env` and by tests pointing at throwaway local servers.
    pub fn from_bases(
        finance: &str,
        chart: &str,
        portfolio: &str,
        comparison: &str,
        ordering: &str,
    ) -> Self {
        Self {
            finance: format!("{}/ask", finance.trim_end_matches('/')),
            chart: format!("{}/chart-links", chart.trim_end_matches('/')),
            portfolio: format!("{}/account-info", portfolio.trim_end_matches('/')),
            comparison: format!("{}/compare", comparison.trim_end_matches('/')),
            market_order: format!("{}/order/market", ordering.trim_end_matches('/')),
            limit_order: format!("{}/order/limit", ordering.trim_end_matches('/')),
            market_status: format!("{}/market-status", ordering.trim_end_matches('/')),
        }
    }

    /// All registry entries as (agent name, endpoint URL) pairs, for
    /// health probing and the root endpoint listing.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("finance", self.finance.as_str()),
            ("chart", self.chart.as_str()),
            ("portfolio", self.portfolio.as_str()),
            ("comparison", self.comparison.as_str()),
            ("market_order", self.market_order.as_str()),
            ("limit_order", self.limit_order.as_str()),
            ("market_status", self.market_status.as_str()),
        ]
    }
}

fn base_from_env(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Strip the final path segment of an endpoint URL to get the service
/// root, which is what health probes hit.
pub fn base_url(endpoint: &str) -> &str {
    match endpoint.rfind('/') {
        Some(idx) => &endpoint[..idx],
        None => endpoint,
    }
}
