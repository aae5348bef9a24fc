//! Intent dispatch
//!
//! One handler per intent variant, selected by an exhaustive match so the
//! compiler flags any intent added without a handler. Handlers extract the
//! parameters their expert agent needs, invoke it over HTTP with a bounded
//! timeout, and normalize the reply (or failure) into the uniform
//! `OrchestratorResponse` envelope.
//!
//! Validation shortfalls (too few symbols) are answered locally with
//! guidance and never reach the network. Uses a long-lived reqwest::Client
//! for connection pooling.

use crate::error::OrchestrationError;
use crate::extractor::EntityExtractor;
use crate::models::{Intent, OrchestratorResponse, OrderParams};
use crate::registry::AgentRegistry;
use crate::Result;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

/// Timeout for status/account/chart/order reads.
const READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for the free-text finance path, which may invoke an LLM.
const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Routes a classified request to its expert agent.
pub struct Dispatcher {
    client: Client,
    registry: AgentRegistry,
    extractor: EntityExtractor,
}

impl Dispatcher {
    pub fn new(registry: AgentRegistry, extractor: EntityExtractor) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            registry,
            extractor,
        }
    }

    /// Dispatch a classified message to the matching expert agent.
    ///
    /// Fails only with `AgentUnavailable` (connect/timeout),
    /// `AgentFailed` (non-2xx) or `InvalidAgentResponse` (bad body);
    /// insufficient entities produce a normal guidance response instead.
    pub async fn dispatch(&self, intent: Intent, message: &str) -> Result<OrchestratorResponse> {
        info!(intent = %intent, "Dispatching request");

        match intent {
            Intent::MarketStatus => self.handle_market_status().await,
            Intent::Portfolio => self.handle_portfolio().await,
            Intent::Comparison => self.handle_comparison(message).await,
            Intent::Chart => self.handle_chart(message).await,
            Intent::Ordering => self.handle_ordering(message).await,
            Intent::Finance => self.handle_finance(message).await,
        }
    }

    async fn handle_market_status(&self) -> Result<OrchestratorResponse> {
        let result = self
            .get_json("market_status_agent", &self.registry.market_status)
            .await?;
        let text = formatted_message("market_status_agent", &result)?;

        Ok(OrchestratorResponse::new(text, "market_status_agent"))
    }

    async fn handle_portfolio(&self) -> Result<OrchestratorResponse> {
        let result = self
            .get_json("portfolio_agent", &self.registry.portfolio)
            .await?;
        let text = formatted_message("portfolio_agent", &result)?;

        Ok(OrchestratorResponse::new(text, "portfolio_agent"))
    }

    async fn handle_comparison(&self, message: &str) -> Result<OrchestratorResponse> {
        let symbols = self.extractor.extract_symbols(message);

        if symbols.len() < 2 {
            return Ok(OrchestratorResponse::new(
                "❌ Need 2 stocks to compare. Example: 'Compare AAPL and TSLA'",
                "orchestrator_validation",
            ));
        }

        let payload = json!({
            "symbol1": &symbols[0],
            "symbol2": &symbols[1],
        });
        let result = self
            .post_json(
                "comparison_agent",
                &self.registry.comparison,
                &payload,
                READ_TIMEOUT,
            )
            .await?;
        let text = formatted_message("comparison_agent", &result)?;

        Ok(
            OrchestratorResponse::new(text, "comparison_agent").with_data(json!({
                "symbols": [&symbols[0], &symbols[1]],
            })),
        )
    }

    async fn handle_chart(&self, message: &str) -> Result<OrchestratorResponse> {
        let symbols = self.extractor.extract_symbols(message);

        let Some(symbol) = symbols.first() else {
            return Ok(OrchestratorResponse::new(
                "❌ Which stock? Example: 'Show me AAPL chart'",
                "orchestrator_validation",
            ));
        };

        let payload = json!({ "symbol": symbol });
        let result = self
            .post_json("chart_agent", &self.registry.chart, &payload, READ_TIMEOUT)
            .await?;
        let text = formatted_message("chart_agent", &result)?;

        Ok(OrchestratorResponse::new(text, "chart_agent")
            .with_data(json!({ "symbol": symbol })))
    }

    async fn handle_ordering(&self, message: &str) -> Result<OrchestratorResponse> {
        let symbols = self.extractor.extract_symbols(message);

        let Some(symbol) = symbols.first() else {
            return Ok(OrchestratorResponse::new(
                "❌ Which stock? Example: 'Buy 5 AAPL'",
                "orchestrator_validation",
            ));
        };

        let params = OrderParams {
            symbol: symbol.clone(),
            qty: self.extractor.extract_quantity(message),
            side: self.extractor.extract_side(message),
            limit_price: self.extractor.extract_price(message),
        };

        // A price makes it a limit order; otherwise market order.
        let (agent, endpoint) = if params.limit_price.is_some() {
            ("limit_order_agent", &self.registry.limit_order)
        } else {
            ("market_order_agent", &self.registry.market_order)
        };

        info!(
            agent,
            symbol = %params.symbol,
            qty = params.qty,
            side = %params.side,
            "Placing order"
        );

        let payload = serde_json::to_value(&params)?;
        let result = self.post_json(agent, endpoint, &payload, READ_TIMEOUT).await?;
        let text = formatted_message(agent, &result)?;

        Ok(OrchestratorResponse::new(text, agent).with_data(payload))
    }

    async fn handle_finance(&self, message: &str) -> Result<OrchestratorResponse> {
        let payload = json!({ "prompt": message });
        let result = self
            .post_json(
                "finance_agent",
                &self.registry.finance,
                &payload,
                ANALYSIS_TIMEOUT,
            )
            .await?;

        // The finance agent answers with "response"; fall back to the
        // common "formatted_message" shape.
        let text = result
            .get("response")
            .and_then(|v| v.as_str())
            .or_else(|| result.get("formatted_message").and_then(|v| v.as_str()))
            .unwrap_or("No response")
            .to_string();

        Ok(OrchestratorResponse::new(text, "finance_agent"))
    }

    async fn get_json(&self, agent: &str, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .timeout(READ_TIMEOUT)
            .send()
            .await
            .map_err(|e| unavailable(agent, e))?;

        read_json_body(agent, response).await
    }

    async fn post_json(
        &self,
        agent: &str,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| unavailable(agent, e))?;

        read_json_body(agent, response).await
    }
}

/// Send failures (refused connection, DNS, timeout) mean the agent could
/// not be reached.
fn unavailable(agent: &str, err: reqwest::Error) -> OrchestrationError {
    error!(agent, "Expert agent unreachable: {}", err);
    OrchestrationError::AgentUnavailable {
        agent: agent.to_string(),
        detail: err.to_string(),
    }
}

async fn read_json_body(agent: &str, response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await.map_err(|e| unavailable(agent, e))?;

    if !status.is_success() {
        error!(agent, status = status.as_u16(), "Expert agent returned error");
        return Err(OrchestrationError::AgentFailed {
            agent: agent.to_string(),
            status: status.as_u16(),
            detail: body,
        });
    }

    serde_json::from_str(&body).map_err(|e| OrchestrationError::InvalidAgentResponse {
        agent: agent.to_string(),
        detail: format!("Invalid JSON response: {}", e),
    })
}

fn formatted_message(agent: &str, result: &Value) -> Result<String> {
    result
        .get("formatted_message")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| OrchestrationError::InvalidAgentResponse {
            agent: agent.to_string(),
            detail: "Missing 'formatted_message' field".to_string(),
        })
}
