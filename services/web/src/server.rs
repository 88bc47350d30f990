use crate::cli::ServeArgs;
use crate::infra::{open_store, AppState};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_tracker::applications::ApplicationService;
use job_tracker::config::AppConfig;
use job_tracker::error::AppError;
use job_tracker::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.database.take() {
        config.database.path = path;
    }

    telemetry::init(&config.telemetry)?;

    let store = open_store(&config.database.path)?;
    let application_service = Arc::new(ApplicationService::new(Arc::new(store)));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_application_routes(application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        database = %config.database.path.display(),
        "job application tracker ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag))
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal(readiness: Arc<std::sync::atomic::AtomicBool>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c; shutting down");
    }
    readiness.store(false, Ordering::Release);
    info!("shutdown requested");
}
