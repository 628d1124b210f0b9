use crate::workflows::survey::{CertificateInput, ShipId};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Clone)]
pub struct RegisterEntry {
    /// 1-based data row, excluding the header line.
    pub row: usize,
    pub ship_id: ShipId,
    pub input: CertificateInput,
}

pub(crate) fn parse_entries<R: Read>(reader: R) -> Result<Vec<RegisterEntry>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for (index, record) in csv_reader.deserialize::<RegisterRow>().enumerate() {
        let row = record?;
        entries.push(RegisterEntry {
            row: index + 1,
            ship_id: ShipId(row.ship),
            input: CertificateInput {
                name: row.certificate,
                content_hint: row.notes,
                next_survey_designation: row.next_survey,
                issue_date: row.issue_date,
                valid_date: row.valid_date,
                last_endorse: row.last_endorse,
                is_interim: flag(row.interim.as_deref()),
                is_condition: flag(row.condition.as_deref()),
            },
        });
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct RegisterRow {
    #[serde(rename = "Ship")]
    ship: String,
    #[serde(rename = "Certificate")]
    certificate: String,
    #[serde(rename = "Issue Date", default, deserialize_with = "empty_string_as_none")]
    issue_date: Option<String>,
    #[serde(rename = "Valid Date", default, deserialize_with = "empty_string_as_none")]
    valid_date: Option<String>,
    #[serde(
        rename = "Last Endorse",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    last_endorse: Option<String>,
    #[serde(rename = "Next Survey", default, deserialize_with = "empty_string_as_none")]
    next_survey: Option<String>,
    #[serde(rename = "Interim", default, deserialize_with = "empty_string_as_none")]
    interim: Option<String>,
    #[serde(rename = "Condition", default, deserialize_with = "empty_string_as_none")]
    condition: Option<String>,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("y" | "yes" | "true" | "1" | "x")
    )
}

#[cfg(test)]
pub(crate) fn flag_for_tests(value: Option<&str>) -> bool {
    flag(value)
}
