use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Certificate, CertificateId, CertificateInput, ShipContext, ShipId};
use super::repository::{CertificateRepository, RepositoryError};
use super::service::{
    CertificateDateUpdate, RegisterCertificate, SurveyScheduleService, SurveyServiceError,
};

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub certificate: CertificateInput,
    #[serde(default)]
    pub ship: ShipContext,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(flatten)]
    pub certificate: RegisterCertificate,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDatesRequest {
    #[serde(flatten)]
    pub update: CertificateDateUpdate,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ShipContextRequest {
    #[serde(flatten)]
    pub context: ShipContext,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecalculateRequest {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

/// Router exposing survey calculation and the certificate recalculation trigger.
pub fn survey_router<R>(service: Arc<SurveyScheduleService<R>>) -> Router
where
    R: CertificateRepository + 'static,
{
    Router::new()
        .route("/api/v1/surveys/calculate", post(calculate_handler::<R>))
        .route("/api/v1/certificates", post(register_handler::<R>))
        .route(
            "/api/v1/certificates/:certificate_id",
            get(fetch_handler::<R>).patch(update_dates_handler::<R>),
        )
        .route(
            "/api/v1/ships/:ship_id/context",
            put(ship_context_handler::<R>),
        )
        .route(
            "/api/v1/ships/:ship_id/recalculate",
            post(recalculate_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn calculate_handler<R>(
    State(service): State<Arc<SurveyScheduleService<R>>>,
    axum::Json(request): axum::Json<CalculateRequest>,
) -> Response
where
    R: CertificateRepository + 'static,
{
    let today = resolve_today(request.today);
    let outcome = Certificate::try_from(request.certificate).and_then(|certificate| {
        service
            .scheduler()
            .recalculate(&certificate, &request.ship, today)
    });

    match outcome {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(SurveyServiceError::Validation(error), "certificate"),
    }
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<SurveyScheduleService<R>>>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    R: CertificateRepository + 'static,
{
    let today = resolve_today(request.today);
    match service.register(request.certificate, today) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error, "certificate"),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<SurveyScheduleService<R>>>,
    Path(certificate_id): Path<String>,
) -> Response
where
    R: CertificateRepository + 'static,
{
    match service.get(&CertificateId(certificate_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error, "certificate"),
    }
}

pub(crate) async fn update_dates_handler<R>(
    State(service): State<Arc<SurveyScheduleService<R>>>,
    Path(certificate_id): Path<String>,
    axum::Json(request): axum::Json<UpdateDatesRequest>,
) -> Response
where
    R: CertificateRepository + 'static,
{
    let today = resolve_today(request.today);
    match service.update_dates(&CertificateId(certificate_id), request.update, today) {
        Ok(outcome) => {
            let payload = json!({
                "changed": outcome.changed,
                "certificate": outcome.record.view(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error, "certificate"),
    }
}

pub(crate) async fn ship_context_handler<R>(
    State(service): State<Arc<SurveyScheduleService<R>>>,
    Path(ship_id): Path<String>,
    axum::Json(request): axum::Json<ShipContextRequest>,
) -> Response
where
    R: CertificateRepository + 'static,
{
    let today = resolve_today(request.today);
    match service.update_ship_context(&ShipId(ship_id), request.context, today) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error, "ship"),
    }
}

pub(crate) async fn recalculate_handler<R>(
    State(service): State<Arc<SurveyScheduleService<R>>>,
    Path(ship_id): Path<String>,
    request: Option<axum::Json<RecalculateRequest>>,
) -> Response
where
    R: CertificateRepository + 'static,
{
    let request = request.map(|axum::Json(request)| request).unwrap_or_default();
    let today = resolve_today(request.today);
    match service.recalculate_ship(&ShipId(ship_id), today) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error, "ship"),
    }
}

/// Maps service errors to JSON responses; `subject` names what a 404 was looking for.
fn error_response(error: SurveyServiceError, subject: &str) -> Response {
    let (status, payload) = match &error {
        SurveyServiceError::Validation(validation) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": validation.to_string(),
                "field": validation.field(),
            }),
        ),
        SurveyServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": format!("{subject} not found") }),
        ),
        SurveyServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            json!({ "error": "certificate already exists" }),
        ),
        SurveyServiceError::Repository(other) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": other.to_string() }),
        ),
    };
    (status, axum::Json(payload)).into_response()
}
