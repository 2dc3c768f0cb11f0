// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::analysis_service::AnalysisService;
use crate::application::dosing_service::DosingService;
use crate::application::equipment_service::EquipmentService;
use crate::application::icp_service::IcpService;
use crate::application::livestock_service::LivestockService;
use crate::infrastructure::config::{load_fixtures_config, load_server_config};
use crate::infrastructure::memory_repository::{InMemoryDosingLog, InMemoryRegistry};
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let server_config = load_server_config()?;
    let fixtures = load_fixtures_config()?;
    tracing::info!(
        "Loaded {} measurement groups, {} events, {} equipment, {} livestock, {} ICP tests, {} doses",
        fixtures.groups.len(),
        fixtures.events.len(),
        fixtures.equipment.len(),
        fixtures.livestock.len(),
        fixtures.icp_tests.len(),
        fixtures.dosing_events.len()
    );

    // Create repository (infrastructure layer)
    let registry = Arc::new(InMemoryRegistry::new(
        fixtures.equipment.clone(),
        fixtures.livestock.clone(),
    ));
    let dosing_log = Arc::new(InMemoryDosingLog::new(fixtures.dosing_events.clone()));

    // Create services (application layer)
    let analysis_service = AnalysisService::new(
        fixtures.groups.clone(),
        fixtures.store(),
        fixtures.events.clone(),
        fixtures.default_events(),
        fixtures.range_end()?,
    );
    let equipment_service = EquipmentService::new(registry.clone());
    let livestock_service = LivestockService::new(registry);
    let icp_service = IcpService::new(fixtures.icp_tests, fixtures.icp_history);
    let dosing_service = DosingService::new(
        dosing_log,
        fixtures.trace_batches,
        fixtures.trace_templates,
    );

    // Create application state
    let state = Arc::new(AppState {
        analysis_service,
        equipment_service,
        livestock_service,
        icp_service,
        dosing_service,
        compress_responses: server_config.server.compress_responses,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = server_config.server.bind.parse()?;
    tracing::info!("Starting reef-analysis service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
