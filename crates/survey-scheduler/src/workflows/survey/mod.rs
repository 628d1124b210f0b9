//! Survey scheduling for ship certificates.
//!
//! A certificate is classified into a survey policy, expanded into its survey
//! windows, matched against the latest endorsement, and the first outstanding
//! window is graded against today's date. Everything up to the service layer
//! is pure and free of I/O.

pub mod classifier;
mod completion;
pub mod domain;
mod engine;
mod normalizer;
pub mod report;
pub mod repository;
mod resolver;
pub mod router;
pub mod service;
mod status;
mod windows;

#[cfg(test)]
mod tests;

pub use classifier::{classify, ClassificationInput, ClassifierRules, KeywordRule, RulePolicy};
pub use completion::mark_completed;
pub use domain::{
    Certificate, CertificateId, CertificateInput, ShipContext, ShipId, SurveyCategory,
    SurveyOrdinal, SurveyStatus, SurveyWindow, ValidationError,
};
pub use engine::{CertificateOutcome, SurveyResult, SurveyScheduler, NO_SURVEY_DISPLAY};
pub use report::{ShipSurveyReport, SurveyDueView, SurveyFailureView};
pub use repository::{CertificateRecord, CertificateRepository, CertificateView, RepositoryError};
pub use resolver::{display, resolve, survey_type};
pub use router::survey_router;
pub use service::{
    CertificateDateUpdate, RegisterCertificate, SurveyScheduleService, SurveyServiceError,
    UpdateOutcome,
};
pub use status::{classify_status, days_until, StatusTarget, StatusThresholds};
pub use windows::{build_windows, years_before, CYCLE_YEARS, WINDOW_DAYS};
