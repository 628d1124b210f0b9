use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Certificate, CertificateId, ShipContext, ShipId, SurveyStatus};
use super::engine::SurveyResult;

/// Stored certificate with the survey fields last derived for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: CertificateId,
    pub ship_id: ShipId,
    pub certificate: Certificate,
    pub result: SurveyResult,
}

impl CertificateRecord {
    pub fn view(&self) -> CertificateView {
        CertificateView {
            id: self.id.clone(),
            ship_id: self.ship_id.clone(),
            name: self.certificate.name.clone(),
            issue_date: self.certificate.issue_date,
            valid_date: self.certificate.valid_date,
            last_endorse: self.certificate.last_endorse,
            category: self.result.category.label(),
            next_survey_date: self.result.next_survey_date,
            next_survey_display: self.result.next_survey_display.clone(),
            next_survey_type: self.result.next_survey_type.clone(),
            status: self.result.status,
            status_label: self.result.status.label(),
            window_open: self.result.window_open,
            window_close: self.result.window_close,
            days_to_window_close: self.result.days_to_window_close,
        }
    }
}

/// Storage abstraction so the recalculation service can be exercised in isolation.
pub trait CertificateRepository: Send + Sync {
    fn insert(&self, record: CertificateRecord) -> Result<CertificateRecord, RepositoryError>;
    fn update(&self, record: CertificateRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CertificateId) -> Result<Option<CertificateRecord>, RepositoryError>;
    fn for_ship(&self, ship_id: &ShipId) -> Result<Vec<CertificateRecord>, RepositoryError>;
    fn ship_context(&self, ship_id: &ShipId) -> Result<Option<ShipContext>, RepositoryError>;
    fn save_ship_context(
        &self,
        ship_id: &ShipId,
        context: ShipContext,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Flattened certificate and survey fields for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateView {
    pub id: CertificateId,
    pub ship_id: ShipId,
    pub name: String,
    pub issue_date: Option<NaiveDate>,
    pub valid_date: Option<NaiveDate>,
    pub last_endorse: Option<NaiveDate>,
    pub category: &'static str,
    pub next_survey_date: Option<NaiveDate>,
    pub next_survey_display: String,
    pub next_survey_type: String,
    pub status: SurveyStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_open: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_close: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_window_close: Option<i64>,
}
