use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::survey::domain::{
    CertificateId, CertificateInput, ShipContext, ShipId,
};
use crate::workflows::survey::engine::SurveyScheduler;
use crate::workflows::survey::repository::{
    CertificateRecord, CertificateRepository, RepositoryError,
};
use crate::workflows::survey::service::{RegisterCertificate, SurveyScheduleService};
use crate::workflows::survey::survey_router;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2025, 12, 29)
}

pub(super) fn ship_id() -> ShipId {
    ShipId("IMO9321483".to_string())
}

pub(super) fn safety_equipment_input() -> CertificateInput {
    CertificateInput {
        name: "Cargo Ship Safety Equipment Certificate".to_string(),
        issue_date: Some("2023-06-28".to_string()),
        valid_date: Some("2028-06-28".to_string()),
        last_endorse: Some("2025-07-16".to_string()),
        ..CertificateInput::default()
    }
}

pub(super) fn tonnage_input() -> CertificateInput {
    CertificateInput {
        name: "International Tonnage Certificate (1969)".to_string(),
        issue_date: Some("2015-03-02".to_string()),
        valid_date: Some("2030-03-02".to_string()),
        ..CertificateInput::default()
    }
}

pub(super) fn register_request(certificate: CertificateInput) -> RegisterCertificate {
    RegisterCertificate {
        ship_id: ship_id(),
        certificate,
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<CertificateId, CertificateRecord>>,
    contexts: Mutex<HashMap<ShipId, ShipContext>>,
    writes: AtomicUsize,
}

impl MemoryRepository {
    pub(super) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(super) fn overwrite(&self, record: CertificateRecord) {
        self.records
            .lock()
            .expect("records mutex")
            .insert(record.id.clone(), record);
    }
}

impl CertificateRepository for MemoryRepository {
    fn insert(&self, record: CertificateRecord) -> Result<CertificateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("records mutex");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    fn update(&self, record: CertificateRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("records mutex");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn fetch(&self, id: &CertificateId) -> Result<Option<CertificateRecord>, RepositoryError> {
        Ok(self.records.lock().expect("records mutex").get(id).cloned())
    }

    fn for_ship(&self, ship_id: &ShipId) -> Result<Vec<CertificateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("records mutex");
        let mut records: Vec<CertificateRecord> = guard
            .values()
            .filter(|record| &record.ship_id == ship_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn ship_context(&self, ship_id: &ShipId) -> Result<Option<ShipContext>, RepositoryError> {
        Ok(self
            .contexts
            .lock()
            .expect("contexts mutex")
            .get(ship_id)
            .copied())
    }

    fn save_ship_context(
        &self,
        ship_id: &ShipId,
        context: ShipContext,
    ) -> Result<(), RepositoryError> {
        self.contexts
            .lock()
            .expect("contexts mutex")
            .insert(ship_id.clone(), context);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl CertificateRepository for UnavailableRepository {
    fn insert(&self, _record: CertificateRecord) -> Result<CertificateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: CertificateRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CertificateId) -> Result<Option<CertificateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_ship(&self, _ship_id: &ShipId) -> Result<Vec<CertificateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn ship_context(&self, _ship_id: &ShipId) -> Result<Option<ShipContext>, RepositoryError> {
        Ok(None)
    }

    fn save_ship_context(
        &self,
        _ship_id: &ShipId,
        _context: ShipContext,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store that no longer knows the ship it is asked about.
pub(super) struct UnknownShipRepository;

impl CertificateRepository for UnknownShipRepository {
    fn insert(&self, record: CertificateRecord) -> Result<CertificateRecord, RepositoryError> {
        Ok(record)
    }

    fn update(&self, _record: CertificateRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn fetch(&self, _id: &CertificateId) -> Result<Option<CertificateRecord>, RepositoryError> {
        Ok(None)
    }

    fn for_ship(&self, _ship_id: &ShipId) -> Result<Vec<CertificateRecord>, RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn ship_context(&self, _ship_id: &ShipId) -> Result<Option<ShipContext>, RepositoryError> {
        Ok(None)
    }

    fn save_ship_context(
        &self,
        _ship_id: &ShipId,
        _context: ShipContext,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) fn build_service() -> (
    SurveyScheduleService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = SurveyScheduleService::new(repository.clone(), SurveyScheduler::default());
    (service, repository)
}

pub(super) fn router_with_service(service: SurveyScheduleService<MemoryRepository>) -> axum::Router {
    survey_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
