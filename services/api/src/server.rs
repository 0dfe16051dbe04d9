use crate::cli::ServeArgs;
use crate::infra::{seeded_donation_history, starter_inventory, AppState, KitchenScale};
use crate::routes::with_pantry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use pantrix::collaborators::DemoCollaborators;
use pantrix::config::AppConfig;
use pantrix::error::AppError;
use pantrix::pantry::Pantry;
use pantrix::telemetry;
use pantrix::workflows::donation::InMemoryDonationRepository;
use pantrix::workflows::inventory::InventoryEngine;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryDonationRepository::default());
    let inventory = if args.no_seed {
        InventoryEngine::new()
    } else {
        let today = Local::now().date_naive();
        InventoryEngine::with_items(starter_inventory(today, KitchenScale::Household))
    };
    let pantry = Pantry::with_inventory(repository, config.pantry.transition_policy, inventory);
    if !args.no_seed {
        let imported = pantry
            .donations()
            .import_history(seeded_donation_history())
            .map_err(pantrix::pantry::PantryError::from)?;
        info!(imported, "seeded donation history");
    }

    let collaborators = Arc::new(DemoCollaborators::new(config.pantry.collaborator_delay));
    let app = with_pantry_routes(pantry.into_shared(), collaborators)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = ?config.pantry.transition_policy,
        "pantrix backend ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
