use crate::cli::ServeArgs;
use crate::infra::{hostel_admin, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hostel_admin::config::AppConfig;
use hostel_admin::error::AppError;
use hostel_admin::hostel::{InMemoryHostelRepository, JsonFileHostelRepository};
use hostel_admin::telemetry;
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

    let routes = match &config.storage.data_file {
        Some(path) => {
            let repository = Arc::new(JsonFileHostelRepository::open(path.clone())?);
            with_service_routes(hostel_admin(repository, &config))
        }
        None => {
            warn!("APP_DATA_FILE not set; hostel records live in memory only");
            let repository = Arc::new(InMemoryHostelRepository::new());
            with_service_routes(hostel_admin(repository, &config))
        }
    };

    let app = routes
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hostel admin service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
