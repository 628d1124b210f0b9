use super::classifier::{ClassificationInput, ClassifierRules};
use super::completion::mark_completed;
use super::domain::{
    Certificate, ShipContext, SurveyCategory, SurveyStatus, SurveyWindow, ValidationError,
};
use super::resolver::{display, resolve, survey_type};
use super::status::{classify_status, days_until, StatusTarget, StatusThresholds};
use super::windows::build_windows;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const NO_SURVEY_DISPLAY: &str = "-";

/// Derived survey fields written back onto a certificate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResult {
    pub category: SurveyCategory,
    pub next_survey_date: Option<NaiveDate>,
    pub next_survey_display: String,
    pub next_survey_type: String,
    pub status: SurveyStatus,
    pub window_open: Option<NaiveDate>,
    pub window_close: Option<NaiveDate>,
    pub days_to_window_close: Option<i64>,
}

impl SurveyResult {
    fn without_survey(category: SurveyCategory, status: SurveyStatus) -> Self {
        Self {
            category,
            next_survey_date: None,
            next_survey_display: NO_SURVEY_DISPLAY.to_string(),
            next_survey_type: NO_SURVEY_DISPLAY.to_string(),
            status,
            window_open: None,
            window_close: None,
            days_to_window_close: None,
        }
    }
}

/// Result of one certificate inside a batch; failures stay local to their entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateOutcome<K> {
    pub key: K,
    pub outcome: Result<SurveyResult, ValidationError>,
}

/// Stateless scheduler combining the classifier table with status thresholds.
#[derive(Debug, Clone, Default)]
pub struct SurveyScheduler {
    rules: ClassifierRules,
    thresholds: StatusThresholds,
}

impl SurveyScheduler {
    pub fn new(rules: ClassifierRules, thresholds: StatusThresholds) -> Self {
        Self { rules, thresholds }
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    pub fn classify(&self, certificate: &Certificate) -> SurveyCategory {
        if self.rules.match_rule(&certificate.name).is_none() && !certificate.is_condition {
            warn!(
                certificate = %certificate.name,
                "unrecognised certificate type; scheduling as annual cycle"
            );
        }
        self.rules.classify(&ClassificationInput::from(certificate))
    }

    /// Windows for the certificate with completion already applied.
    pub fn windows(&self, certificate: &Certificate) -> Result<Vec<SurveyWindow>, ValidationError> {
        let category = self.classify(certificate);
        let windows = build_windows(category, certificate.issue_date, certificate.valid_date)?;
        Ok(mark_completed(windows, certificate.last_endorse))
    }

    pub fn recalculate(
        &self,
        certificate: &Certificate,
        ship: &ShipContext,
        today: NaiveDate,
    ) -> Result<SurveyResult, ValidationError> {
        let category = self.classify(certificate);

        let Some(valid_date) = certificate.valid_date else {
            return Ok(SurveyResult::without_survey(
                category,
                SurveyStatus::NotApplicable,
            ));
        };

        let windows = build_windows(category, certificate.issue_date, Some(valid_date))?;

        if category == SurveyCategory::NoAnnualSurvey {
            let status = classify_status(StatusTarget::Expiry(valid_date), today, &self.thresholds);
            return Ok(SurveyResult::without_survey(category, status));
        }

        if certificate.issue_date.is_none() {
            return Ok(SurveyResult::without_survey(
                category,
                SurveyStatus::NotApplicable,
            ));
        }

        let windows = mark_completed(windows, certificate.last_endorse);

        let Some(window) = resolve(&windows) else {
            let status = classify_status(StatusTarget::Expiry(valid_date), today, &self.thresholds);
            debug!(certificate = %certificate.name, ?status, "survey cycle fully satisfied");
            return Ok(SurveyResult::without_survey(category, status));
        };

        let next_survey_date = window.anchor_date.min(valid_date);
        let status = classify_status(
            StatusTarget::Window { window, valid_date },
            today,
            &self.thresholds,
        );

        debug!(
            certificate = %certificate.name,
            ordinal = ?window.ordinal,
            %next_survey_date,
            ?status,
            "resolved next survey"
        );

        Ok(SurveyResult {
            category,
            next_survey_date: Some(next_survey_date),
            next_survey_display: display(window.ordinal, next_survey_date),
            next_survey_type: survey_type(window, ship).to_string(),
            status,
            window_open: Some(window.open_date),
            window_close: Some(window.close_date),
            days_to_window_close: Some(days_until(window.close_date, today)),
        })
    }

    pub fn recalculate_all<'c, K, I>(
        &self,
        certificates: I,
        ship: &ShipContext,
        today: NaiveDate,
    ) -> Vec<CertificateOutcome<K>>
    where
        I: IntoIterator<Item = (K, &'c Certificate)>,
    {
        certificates
            .into_iter()
            .map(|(key, certificate)| CertificateOutcome {
                key,
                outcome: self.recalculate(certificate, ship, today),
            })
            .collect()
    }
}
