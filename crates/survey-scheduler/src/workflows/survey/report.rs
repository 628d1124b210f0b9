use super::domain::{CertificateId, ShipId, SurveyStatus, ValidationError};
use super::engine::{SurveyResult, NO_SURVEY_DISPLAY};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: SurveyStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyDueView {
    pub certificate_id: CertificateId,
    pub certificate_name: String,
    pub next_survey_date: NaiveDate,
    pub next_survey_display: String,
    pub next_survey_type: String,
    pub status: SurveyStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_window_close: Option<i64>,
}

/// Certificate whose dates could not be scheduled; shown as `-` downstream.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyFailureView {
    pub certificate_id: CertificateId,
    pub certificate_name: String,
    pub field: &'static str,
    pub error: String,
    pub next_survey_display: &'static str,
}

/// Per-ship roll-up of a batch recalculation.
#[derive(Debug, Clone, Serialize)]
pub struct ShipSurveyReport {
    pub ship_id: ShipId,
    pub today: NaiveDate,
    pub status_counts: Vec<StatusCountEntry>,
    pub upcoming: Vec<SurveyDueView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SurveyFailureView>,
}

impl ShipSurveyReport {
    pub fn builder(ship_id: ShipId, today: NaiveDate) -> ShipSurveyReportBuilder {
        ShipSurveyReportBuilder {
            ship_id,
            today,
            counts: HashMap::new(),
            upcoming: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn count(&self, status: SurveyStatus) -> usize {
        self.status_counts
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    /// Upcoming surveys that already need someone's attention.
    pub fn attention(&self) -> impl Iterator<Item = &SurveyDueView> {
        self.upcoming.iter().filter(|view| {
            matches!(
                view.status,
                SurveyStatus::DueSoon | SurveyStatus::Critical | SurveyStatus::Overdue
            )
        })
    }
}

pub struct ShipSurveyReportBuilder {
    ship_id: ShipId,
    today: NaiveDate,
    counts: HashMap<SurveyStatus, usize>,
    upcoming: Vec<SurveyDueView>,
    failures: Vec<SurveyFailureView>,
}

impl ShipSurveyReportBuilder {
    pub fn record(
        &mut self,
        certificate_id: CertificateId,
        certificate_name: &str,
        outcome: Result<&SurveyResult, &ValidationError>,
    ) -> &mut Self {
        match outcome {
            Ok(result) => {
                *self.counts.entry(result.status).or_default() += 1;
                if let Some(next_survey_date) = result.next_survey_date {
                    self.upcoming.push(SurveyDueView {
                        certificate_id,
                        certificate_name: certificate_name.to_string(),
                        next_survey_date,
                        next_survey_display: result.next_survey_display.clone(),
                        next_survey_type: result.next_survey_type.clone(),
                        status: result.status,
                        status_label: result.status.label(),
                        days_to_window_close: result.days_to_window_close,
                    });
                }
            }
            Err(error) => self.failures.push(SurveyFailureView {
                certificate_id,
                certificate_name: certificate_name.to_string(),
                field: error.field(),
                error: error.to_string(),
                next_survey_display: NO_SURVEY_DISPLAY,
            }),
        }
        self
    }

    pub fn finish(self) -> ShipSurveyReport {
        let mut upcoming = self.upcoming;
        upcoming.sort_by(|a, b| {
            a.next_survey_date
                .cmp(&b.next_survey_date)
                .then_with(|| a.certificate_id.cmp(&b.certificate_id))
        });

        let status_counts = SurveyStatus::ordered()
            .into_iter()
            .map(|status| StatusCountEntry {
                status,
                status_label: status.label(),
                count: self.counts.get(&status).copied().unwrap_or(0),
            })
            .collect();

        ShipSurveyReport {
            ship_id: self.ship_id,
            today: self.today,
            status_counts,
            upcoming,
            failures: self.failures,
        }
    }
}
