use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use survey_scheduler::workflows::survey::domain::parse_date_field;
use survey_scheduler::workflows::survey::{
    CertificateId, CertificateRecord, CertificateRepository, RepositoryError, ShipContext, ShipId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Store {
    certificates: HashMap<CertificateId, CertificateRecord>,
    ships: HashMap<ShipId, ShipContext>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCertificateRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryCertificateRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Store>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Unavailable("certificate store poisoned".to_string()))
    }
}

impl CertificateRepository for InMemoryCertificateRepository {
    fn insert(&self, record: CertificateRecord) -> Result<CertificateRecord, RepositoryError> {
        let mut store = self.lock()?;
        if store.certificates.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        store.certificates.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: CertificateRecord) -> Result<(), RepositoryError> {
        let mut store = self.lock()?;
        match store.certificates.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &CertificateId) -> Result<Option<CertificateRecord>, RepositoryError> {
        Ok(self.lock()?.certificates.get(id).cloned())
    }

    fn for_ship(&self, ship_id: &ShipId) -> Result<Vec<CertificateRecord>, RepositoryError> {
        let store = self.lock()?;
        let mut records: Vec<_> = store
            .certificates
            .values()
            .filter(|record| &record.ship_id == ship_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn ship_context(&self, ship_id: &ShipId) -> Result<Option<ShipContext>, RepositoryError> {
        Ok(self.lock()?.ships.get(ship_id).copied())
    }

    fn save_ship_context(
        &self,
        ship_id: &ShipId,
        context: ShipContext,
    ) -> Result<(), RepositoryError> {
        self.lock()?.ships.insert(ship_id.clone(), context);
        Ok(())
    }
}

/// Command-line date parser accepting the same formats as the ingestion layer.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    match parse_date_field("date", Some(raw)) {
        Ok(Some(date)) => Ok(date),
        Ok(None) => Err("date must not be empty".to_string()),
        Err(_) => Err(format!(
            "failed to parse '{raw}' as YYYY-MM-DD or DD/MM/YYYY"
        )),
    }
}
