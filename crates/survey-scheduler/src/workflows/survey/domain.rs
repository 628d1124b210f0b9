use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipId(pub String);

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Survey policy a certificate falls under once classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyCategory {
    NoAnnualSurvey,
    AnnualCycle,
    InitialStatutory,
    ConditionExpiry,
}

impl SurveyCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoAnnualSurvey => "No Annual Survey",
            Self::AnnualCycle => "Annual Cycle",
            Self::InitialStatutory => "Initial Statutory",
            Self::ConditionExpiry => "Condition Expiry",
        }
    }
}

/// Position of a window inside a certificate's survey cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyOrdinal {
    FirstAnnual,
    SecondAnnual,
    ThirdAnnual,
    FourthAnnual,
    Special,
    Initial,
    ConditionExpiry,
}

impl SurveyOrdinal {
    pub const fn annual() -> [Self; 4] {
        [
            Self::FirstAnnual,
            Self::SecondAnnual,
            Self::ThirdAnnual,
            Self::FourthAnnual,
        ]
    }

    pub const fn is_annual(self) -> bool {
        matches!(
            self,
            Self::FirstAnnual | Self::SecondAnnual | Self::ThirdAnnual | Self::FourthAnnual
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstAnnual => "1st Annual Survey",
            Self::SecondAnnual => "2nd Annual Survey/Intermediate Survey",
            Self::ThirdAnnual => "3rd Annual Survey",
            Self::FourthAnnual => "4th Annual Survey",
            Self::Special => "Special Survey",
            Self::Initial => "Initial",
            Self::ConditionExpiry => "Condition Expiry",
        }
    }

    /// Window tolerance shown next to the due date.
    pub const fn tolerance_suffix(self) -> Option<&'static str> {
        match self {
            Self::FirstAnnual | Self::SecondAnnual | Self::ThirdAnnual | Self::FourthAnnual => {
                Some("(±3M)")
            }
            Self::Special | Self::Initial => Some("(-3M)"),
            Self::ConditionExpiry => None,
        }
    }
}

/// Permissible completion range for one survey obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyWindow {
    pub ordinal: SurveyOrdinal,
    pub anchor_date: NaiveDate,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub completed: bool,
}

impl SurveyWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.open_date <= date && date <= self.close_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    Valid,
    DueSoon,
    Critical,
    Overdue,
    NotApplicable,
}

impl SurveyStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Overdue,
            Self::Critical,
            Self::DueSoon,
            Self::Valid,
            Self::NotApplicable,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::DueSoon => "Due Soon",
            Self::Critical => "Critical",
            Self::Overdue => "Overdue",
            Self::NotApplicable => "N/A",
        }
    }
}

/// Ship-level hints consumed by the resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipContext {
    #[serde(default)]
    pub last_intermediate_survey: Option<NaiveDate>,
}

/// Certificate fields as delivered by ingestion, with dates still in text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateInput {
    pub name: String,
    pub content_hint: Option<String>,
    pub next_survey_designation: Option<String>,
    pub issue_date: Option<String>,
    pub valid_date: Option<String>,
    pub last_endorse: Option<String>,
    pub is_interim: bool,
    pub is_condition: bool,
}

/// Validated engine input. Dates are only ever read by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub name: String,
    pub content_hint: Option<String>,
    pub next_survey_designation: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub valid_date: Option<NaiveDate>,
    pub last_endorse: Option<NaiveDate>,
    pub is_interim: bool,
    pub is_condition: bool,
}

impl Certificate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_hint: None,
            next_survey_designation: None,
            issue_date: None,
            valid_date: None,
            last_endorse: None,
            is_interim: false,
            is_condition: false,
        }
    }

    pub fn with_dates(
        mut self,
        issue_date: Option<NaiveDate>,
        valid_date: Option<NaiveDate>,
        last_endorse: Option<NaiveDate>,
    ) -> Self {
        self.issue_date = issue_date;
        self.valid_date = valid_date;
        self.last_endorse = last_endorse;
        self
    }
}

impl TryFrom<CertificateInput> for Certificate {
    type Error = ValidationError;

    fn try_from(input: CertificateInput) -> Result<Self, Self::Error> {
        Ok(Self {
            issue_date: parse_date_field("issue_date", input.issue_date.as_deref())?,
            valid_date: parse_date_field("valid_date", input.valid_date.as_deref())?,
            last_endorse: parse_date_field("last_endorse", input.last_endorse.as_deref())?,
            name: input.name,
            content_hint: input.content_hint,
            next_survey_designation: input.next_survey_designation,
            is_interim: input.is_interim,
            is_condition: input.is_condition,
        })
    }
}

/// Input rejected before any survey arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is not a recognised date: '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("issue_date {issue_date} is after valid_date {valid_date}")]
    IssueAfterExpiry {
        issue_date: NaiveDate,
        valid_date: NaiveDate,
    },
    #[error("{field} {date} is too close to the calendar limits to schedule surveys")]
    DateOutOfRange { field: &'static str, date: NaiveDate },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidDate { field, .. } => field,
            ValidationError::IssueAfterExpiry { .. } => "issue_date",
            ValidationError::DateOutOfRange { field, .. } => field,
        }
    }
}

/// Parses `YYYY-MM-DD`, `DD/MM/YYYY` or RFC 3339; blank values count as absent.
pub fn parse_date_field(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%d/%m/%Y") {
        return Ok(Some(date));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.date_naive()));
    }

    Err(ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
