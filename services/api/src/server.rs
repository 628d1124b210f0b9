use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCertificateRepository};
use crate::routes::with_survey_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use survey_scheduler::config::AppConfig;
use survey_scheduler::error::AppError;
use survey_scheduler::telemetry;
use survey_scheduler::workflows::survey::SurveyScheduleService;
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

    let scheduler = config.scheduling.scheduler()?;
    info!(
        rules = scheduler.rules().rules().len(),
        due_soon_days = scheduler.thresholds().due_soon_days,
        critical_days = scheduler.thresholds().critical_days,
        "survey scheduler configured"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryCertificateRepository::default());
    let survey_service = Arc::new(SurveyScheduleService::new(repository, scheduler));

    let app = with_survey_routes(survey_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "survey scheduling service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
