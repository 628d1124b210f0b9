use super::domain::{Certificate, SurveyCategory};
use super::normalizer::{contains_phrase, normalize_name};
use serde::{Deserialize, Serialize};

/// What a matched keyword says about the certificate's survey regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePolicy {
    Condition,
    Statutory,
    NoAnnualSurvey,
    DangerousGoods,
    AnnualCycle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub policy: RulePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'r> {
    pub keyword: &'r str,
    pub policy: RulePolicy,
}

/// Borrowed view of the certificate fields the classifier looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationInput<'a> {
    pub name: &'a str,
    pub content_hint: Option<&'a str>,
    pub designation: Option<&'a str>,
    pub is_interim: bool,
    pub is_condition: bool,
}

impl<'a> From<&'a Certificate> for ClassificationInput<'a> {
    fn from(certificate: &'a Certificate) -> Self {
        Self {
            name: &certificate.name,
            content_hint: certificate.content_hint.as_deref(),
            designation: certificate.next_survey_designation.as_deref(),
            is_interim: certificate.is_interim,
            is_condition: certificate.is_condition,
        }
    }
}

const STANDARD_RULES: &[(&str, RulePolicy)] = &[
    ("conditional", RulePolicy::Condition),
    ("condition of class", RulePolicy::Condition),
    ("short term", RulePolicy::Condition),
    ("survey extension", RulePolicy::Condition),
    ("extension", RulePolicy::Condition),
    ("safety management certificate", RulePolicy::Statutory),
    ("safety management", RulePolicy::Statutory),
    ("smc", RulePolicy::Statutory),
    ("ism", RulePolicy::Statutory),
    ("ship security certificate", RulePolicy::Statutory),
    ("ship security", RulePolicy::Statutory),
    ("issc", RulePolicy::Statutory),
    ("isps", RulePolicy::Statutory),
    ("maritime labour certificate", RulePolicy::Statutory),
    ("maritime labour", RulePolicy::Statutory),
    ("mlc", RulePolicy::Statutory),
    ("document of compliance", RulePolicy::Statutory),
    ("tonnage", RulePolicy::NoAnnualSurvey),
    ("registry", RulePolicy::NoAnnualSurvey),
    ("registration", RulePolicy::NoAnnualSurvey),
    ("insurance", RulePolicy::NoAnnualSurvey),
    ("civil liability", RulePolicy::NoAnnualSurvey),
    ("bunker", RulePolicy::NoAnnualSurvey),
    ("wreck removal", RulePolicy::NoAnnualSurvey),
    ("p&i", RulePolicy::NoAnnualSurvey),
    ("safe manning", RulePolicy::NoAnnualSurvey),
    ("continuous synopsis record", RulePolicy::NoAnnualSurvey),
    ("sanitation", RulePolicy::NoAnnualSurvey),
    ("suez canal", RulePolicy::NoAnnualSurvey),
    ("panama canal", RulePolicy::NoAnnualSurvey),
    ("dangerous goods", RulePolicy::DangerousGoods),
    ("carriage of dangerous goods", RulePolicy::DangerousGoods),
    ("document of compliance dangerous goods", RulePolicy::DangerousGoods),
    ("dangerous goods document of compliance", RulePolicy::DangerousGoods),
    ("classification", RulePolicy::AnnualCycle),
    ("class certificate", RulePolicy::AnnualCycle),
    ("safety construction", RulePolicy::AnnualCycle),
    ("safety equipment", RulePolicy::AnnualCycle),
    ("safety radio", RulePolicy::AnnualCycle),
    ("load line", RulePolicy::AnnualCycle),
    ("iopp", RulePolicy::AnnualCycle),
    ("oil pollution prevention", RulePolicy::AnnualCycle),
    ("air pollution prevention", RulePolicy::AnnualCycle),
    ("iapp", RulePolicy::AnnualCycle),
    ("sewage pollution prevention", RulePolicy::AnnualCycle),
    ("noxious liquid", RulePolicy::AnnualCycle),
    ("ballast water management", RulePolicy::AnnualCycle),
    ("fitness", RulePolicy::AnnualCycle),
];

const STANDARD_ANNUAL_MARKERS: &[&str] = &[
    "1st annual survey",
    "2nd annual survey",
    "3rd annual survey",
    "4th annual survey",
    "annual survey",
];

const STANDARD_INITIAL_DESIGNATIONS: &[&str] = &["initial"];

#[derive(Debug, Clone, Deserialize)]
struct RuleTable {
    rules: Vec<KeywordRule>,
    #[serde(default = "standard_annual_markers")]
    annual_markers: Vec<String>,
    #[serde(default = "standard_initial_designations")]
    initial_designations: Vec<String>,
}

fn standard_annual_markers() -> Vec<String> {
    STANDARD_ANNUAL_MARKERS.iter().map(|s| s.to_string()).collect()
}

fn standard_initial_designations() -> Vec<String> {
    STANDARD_INITIAL_DESIGNATIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl From<RuleTable> for ClassifierRules {
    fn from(table: RuleTable) -> Self {
        Self::new(table.rules, table.annual_markers, table.initial_designations)
    }
}

/// Immutable keyword table mapping free-text certificate names to a survey policy.
///
/// Among all matching keywords the longest wins; equal lengths fall back to table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleTable")]
pub struct ClassifierRules {
    rules: Vec<KeywordRule>,
    annual_markers: Vec<String>,
    initial_designations: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl ClassifierRules {
    pub fn new(
        rules: Vec<KeywordRule>,
        annual_markers: Vec<String>,
        initial_designations: Vec<String>,
    ) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| KeywordRule {
                keyword: normalize_name(&rule.keyword),
                policy: rule.policy,
            })
            .filter(|rule| !rule.keyword.is_empty())
            .collect();

        Self {
            rules,
            annual_markers: normalize_all(annual_markers),
            initial_designations: normalize_all(initial_designations),
        }
    }

    pub fn standard() -> Self {
        let rules = STANDARD_RULES
            .iter()
            .map(|(keyword, policy)| KeywordRule {
                keyword: keyword.to_string(),
                policy: *policy,
            })
            .collect();

        Self::new(
            rules,
            standard_annual_markers(),
            standard_initial_designations(),
        )
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn match_rule(&self, name: &str) -> Option<RuleMatch<'_>> {
        let normalized = normalize_name(name);
        let mut best: Option<&KeywordRule> = None;

        for rule in &self.rules {
            if !contains_phrase(&normalized, &rule.keyword) {
                continue;
            }
            if best.map_or(true, |current| rule.keyword.len() > current.keyword.len()) {
                best = Some(rule);
            }
        }

        best.map(|rule| RuleMatch {
            keyword: &rule.keyword,
            policy: rule.policy,
        })
    }

    pub fn classify(&self, input: &ClassificationInput<'_>) -> SurveyCategory {
        if input.is_condition {
            return SurveyCategory::ConditionExpiry;
        }

        match self.match_rule(input.name).map(|matched| matched.policy) {
            Some(RulePolicy::Condition) => SurveyCategory::ConditionExpiry,
            Some(RulePolicy::Statutory) => {
                if input.is_interim || self.designates_initial(input.designation) {
                    SurveyCategory::InitialStatutory
                } else {
                    SurveyCategory::AnnualCycle
                }
            }
            _ if input.is_interim => SurveyCategory::ConditionExpiry,
            Some(RulePolicy::NoAnnualSurvey) => SurveyCategory::NoAnnualSurvey,
            Some(RulePolicy::DangerousGoods) => {
                if self.has_annual_marker(input.content_hint) {
                    SurveyCategory::AnnualCycle
                } else {
                    SurveyCategory::NoAnnualSurvey
                }
            }
            Some(RulePolicy::AnnualCycle) | None => SurveyCategory::AnnualCycle,
        }
    }

    fn designates_initial(&self, designation: Option<&str>) -> bool {
        let Some(designation) = designation else {
            return false;
        };
        let normalized = normalize_name(designation);
        self.initial_designations
            .iter()
            .any(|word| contains_phrase(&normalized, word))
    }

    fn has_annual_marker(&self, content_hint: Option<&str>) -> bool {
        let Some(content) = content_hint else {
            return false;
        };
        let normalized = normalize_name(content);
        self.annual_markers
            .iter()
            .any(|marker| contains_phrase(&normalized, marker))
    }
}

fn normalize_all(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .map(|value| normalize_name(value))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Classifies with the standard rule table.
pub fn classify(certificate_name: &str, content_hint: Option<&str>) -> SurveyCategory {
    ClassifierRules::standard().classify(&ClassificationInput {
        name: certificate_name,
        content_hint,
        ..ClassificationInput::default()
    })
}
