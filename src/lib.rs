//! Stock Orchestrator
//!
//! Routes free-text user requests to specialized expert agents (finance
//! analysis, portfolio lookup, charting, comparison, order placement,
//! market status) based on inferred intent:
//!
//! MESSAGE → CLASSIFY (consults entity extraction) → DISPATCH → EXPERT
//! AGENT → NORMALIZED RESPONSE
//!
//! The core is pure and stateless: entity extraction and intent
//! classification are deterministic functions of the message text, and
//! the only I/O happens at the dispatcher's bounded outbound calls.

pub mod api;
pub mod classifier;
pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod health;
pub mod models;
pub mod registry;

pub use error::Result;

// Re-export common types
pub use classifier::IntentClassifier;
pub use dispatcher::Dispatcher;
pub use extractor::EntityExtractor;
pub use health::HealthAggregator;
pub use models::*;
pub use registry::AgentRegistry;
