//! Core data models for the stock orchestrator

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

//
// ================= Intent =================
//

/// Closed set of downstream actions a user message can request.
///
/// `Finance` is the default: any message that matches no specific rule is
/// forwarded to the free-text finance agent, so every request is handled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    MarketStatus,
    Portfolio,
    Comparison,
    Ordering,
    Chart,
    Finance,
}

impl Intent {
    /// Every recognized intent, in classification priority order.
    pub const ALL: [Intent; 6] = [
        Intent::MarketStatus,
        Intent::Portfolio,
        Intent::Comparison,
        Intent::Ordering,
        Intent::Chart,
        Intent::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MarketStatus => "market_status",
            Intent::Portfolio => "portfolio",
            Intent::Comparison => "comparison",
            Intent::Ordering => "ordering",
            Intent::Chart => "chart",
            Intent::Finance => "finance",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ================= Order Side =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ================= Request =================
//

/// Inbound user request: a single free-text message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    pub message: String,
}

//
// ================= Order Parameters =================
//

/// Structured order parameters pulled out of a free-text ordering request.
/// Serialized as-is into the ordering agent payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderParams {
    pub symbol: String,
    pub qty: u32,
    pub side: OrderSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
}

//
// ================= Response =================
//

/// Uniform envelope every dispatch resolves to, regardless of which expert
/// agent produced the answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorResponse {
    pub response: String,
    pub agent_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<serde_json::Value>,
}

impl OrchestratorResponse {
    pub fn new(response: impl Into<String>, agent_used: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            agent_used: agent_used.into(),
            extracted_data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.extracted_data = Some(data);
        self
    }
}

//
// ================= Health =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentHealth {
    Healthy,
    Degraded,
    Unavailable,
}

impl fmt::Display for AgentHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentHealth::Healthy => "healthy",
            AgentHealth::Degraded => "degraded",
            AgentHealth::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// Aggregated reachability report across all registered expert agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub experts: HashMap<String, AgentHealth>,
    pub all_healthy: bool,
}

impl HealthReport {
    pub fn new(experts: HashMap<String, AgentHealth>) -> Self {
        let all_healthy = experts.values().all(|h| *h == AgentHealth::Healthy);
        Self {
            experts,
            all_healthy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_serializes_snake_case() {
        let json = serde_json::to_string(&Intent::MarketStatus).unwrap();
        assert_eq!(json, "\"market_status\"");
    }

    #[test]
    fn order_params_omit_absent_limit_price() {
        let params = OrderParams {
            symbol: "AAPL".to_string(),
            qty: 5,
            side: OrderSide::Buy,
            limit_price: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("limit_price").is_none());
        assert_eq!(json["side"], "buy");
    }

    #[test]
    fn health_report_flags_degraded_fleet() {
        let mut experts = HashMap::new();
        experts.insert("finance".to_string(), AgentHealth::Healthy);
        experts.insert("chart".to_string(), AgentHealth::Unavailable);
        let report = HealthReport::new(experts);
        assert!(!report.all_healthy);
    }
}
