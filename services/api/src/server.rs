use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReviewDirectory};
use crate::routes::with_connection_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use reviewmatch::config::AppConfig;
use reviewmatch::error::AppError;
use reviewmatch::telemetry;
use reviewmatch::workflows::dataset::{DatasetImporter, ReviewDataset};
use reviewmatch::workflows::separation::{AdminAllowList, ConnectionService};
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dataset = match config.directory.data_dir.as_deref() {
        Some(dir) => DatasetImporter::from_dir(dir)?,
        None => {
            warn!("APP_DATA_DIR not set; serving an empty review directory");
            ReviewDataset::default()
        }
    };
    let directory = Arc::new(InMemoryReviewDirectory::from_dataset(dataset));

    let authorizer = AdminAllowList::new(config.access.admin_emails.iter().cloned());
    if authorizer.is_empty() {
        warn!("APP_ADMIN_EMAILS is empty; every connection request will be rejected");
    }

    info!(
        assignments = directory.assignment_count(),
        administrators = authorizer.len(),
        "review directory loaded"
    );

    let connection_service = Arc::new(ConnectionService::new(directory, Arc::new(authorizer)));

    let app = with_connection_routes(connection_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "reviewmatch separation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
