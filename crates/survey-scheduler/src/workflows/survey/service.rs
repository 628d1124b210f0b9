use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    parse_date_field, Certificate, CertificateId, CertificateInput, ShipContext, ShipId,
    ValidationError,
};
use super::engine::SurveyScheduler;
use super::report::ShipSurveyReport;
use super::repository::{CertificateRecord, CertificateRepository, RepositoryError};

/// New certificate for a ship, as handed over by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCertificate {
    pub ship_id: ShipId,
    #[serde(flatten)]
    pub certificate: CertificateInput,
}

/// Date changes from ingestion; absent fields stay untouched, blank strings clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateDateUpdate {
    pub issue_date: Option<String>,
    pub valid_date: Option<String>,
    pub last_endorse: Option<String>,
}

impl CertificateDateUpdate {
    fn apply(&self, certificate: &mut Certificate) -> Result<(), ValidationError> {
        if let Some(raw) = &self.issue_date {
            certificate.issue_date = parse_date_field("issue_date", Some(raw))?;
        }
        if let Some(raw) = &self.valid_date {
            certificate.valid_date = parse_date_field("valid_date", Some(raw))?;
        }
        if let Some(raw) = &self.last_endorse {
            certificate.last_endorse = parse_date_field("last_endorse", Some(raw))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub record: CertificateRecord,
    pub changed: bool,
}

/// Recalculation trigger: every mutation re-runs the scheduler and persists its result.
pub struct SurveyScheduleService<R> {
    repository: Arc<R>,
    scheduler: Arc<SurveyScheduler>,
}

static CERTIFICATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_certificate_id() -> CertificateId {
    let id = CERTIFICATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CertificateId(format!("cert-{id:06}"))
}

impl<R> SurveyScheduleService<R>
where
    R: CertificateRepository + 'static,
{
    pub fn new(repository: Arc<R>, scheduler: SurveyScheduler) -> Self {
        Self {
            repository,
            scheduler: Arc::new(scheduler),
        }
    }

    pub fn scheduler(&self) -> &SurveyScheduler {
        &self.scheduler
    }

    pub fn register(
        &self,
        request: RegisterCertificate,
        today: NaiveDate,
    ) -> Result<CertificateRecord, SurveyServiceError> {
        let certificate = Certificate::try_from(request.certificate)?;
        let ship = self.context_for(&request.ship_id)?;
        let result = self.scheduler.recalculate(&certificate, &ship, today)?;

        let record = CertificateRecord {
            id: next_certificate_id(),
            ship_id: request.ship_id,
            certificate,
            result,
        };

        let stored = self.repository.insert(record)?;
        info!(
            certificate_id = %stored.id,
            ship_id = %stored.ship_id,
            status = stored.result.status.label(),
            "certificate registered"
        );
        Ok(stored)
    }

    /// Applies new dates and recalculates; unchanged records are not written back.
    pub fn update_dates(
        &self,
        id: &CertificateId,
        update: CertificateDateUpdate,
        today: NaiveDate,
    ) -> Result<UpdateOutcome, SurveyServiceError> {
        let existing = self.get(id)?;
        let mut certificate = existing.certificate.clone();
        update.apply(&mut certificate)?;

        let ship = self.context_for(&existing.ship_id)?;
        let result = self.scheduler.recalculate(&certificate, &ship, today)?;

        let record = CertificateRecord {
            certificate,
            result,
            ..existing.clone()
        };

        let changed = record != existing;
        if changed {
            self.repository.update(record.clone())?;
        }

        Ok(UpdateOutcome { record, changed })
    }

    pub fn get(&self, id: &CertificateId) -> Result<CertificateRecord, SurveyServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn update_ship_context(
        &self,
        ship_id: &ShipId,
        context: ShipContext,
        today: NaiveDate,
    ) -> Result<ShipSurveyReport, SurveyServiceError> {
        self.repository.save_ship_context(ship_id, context)?;
        self.recalculate_ship(ship_id, today)
    }

    /// Recalculates every certificate of a ship; one bad certificate never blocks the rest.
    pub fn recalculate_ship(
        &self,
        ship_id: &ShipId,
        today: NaiveDate,
    ) -> Result<ShipSurveyReport, SurveyServiceError> {
        let records = self.repository.for_ship(ship_id)?;
        let ship = self.context_for(ship_id)?;

        let outcomes = self.scheduler.recalculate_all(
            records.iter().map(|record| (record, &record.certificate)),
            &ship,
            today,
        );

        let mut report = ShipSurveyReport::builder(ship_id.clone(), today);
        let mut written = 0usize;
        for outcome in outcomes {
            let record = outcome.key;
            match &outcome.outcome {
                Ok(result) if *result != record.result => {
                    self.repository.update(CertificateRecord {
                        result: result.clone(),
                        ..record.clone()
                    })?;
                    written += 1;
                }
                Ok(_) => {}
                Err(error) => warn!(
                    certificate_id = %record.id,
                    field = error.field(),
                    %error,
                    "survey recalculation failed"
                ),
            }
            report.record(
                record.id.clone(),
                &record.certificate.name,
                outcome.outcome.as_ref(),
            );
        }

        info!(%ship_id, certificates = records.len(), written, "ship surveys recalculated");
        Ok(report.finish())
    }

    fn context_for(&self, ship_id: &ShipId) -> Result<ShipContext, RepositoryError> {
        Ok(self.repository.ship_context(ship_id)?.unwrap_or_default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SurveyServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
