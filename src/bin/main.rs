use std::sync::Arc;
use stock_orchestrator::{
    api::{start_server, ApiState},
    classifier::IntentClassifier,
    dispatcher::Dispatcher,
    extractor::EntityExtractor,
    health::HealthAggregator,
    registry::AgentRegistry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("🚀 Stock Orchestrator - API Server");
    info!("📍 Port: {}", port);

    // Create components
    let registry = AgentRegistry::from_env();
    let classifier = Arc::new(IntentClassifier::new(EntityExtractor::new()));
    let dispatcher = Arc::new(Dispatcher::new(registry.clone(), EntityExtractor::new()));
    let health = Arc::new(HealthAggregator::new(registry.clone()));

    for (name, endpoint) in registry.entries() {
        info!("🔗 {} → {}", name, endpoint);
    }

    let state = ApiState {
        classifier,
        dispatcher,
        health,
    };

    info!("✅ Orchestrator initialized");
    info!("📡 Starting API server...");

    start_server(state, port).await?;

    Ok(())
}
