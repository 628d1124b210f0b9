//! Certificate register import from spreadsheet exports.

mod parser;

pub use parser::RegisterEntry;

use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RegisterImportError {
    #[error("failed to read certificate register: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid certificate register CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads `Ship, Certificate, Issue Date, Valid Date, Last Endorse, Next Survey,
/// Interim, Condition, Notes` rows. Dates stay textual; they are validated per
/// certificate during recalculation.
pub struct CertificateRegisterImporter;

impl CertificateRegisterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RegisterEntry>, RegisterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RegisterEntry>, RegisterImportError> {
        Ok(parser::parse_entries(reader)?)
    }
}
