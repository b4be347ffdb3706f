//! Load-pipeline errors.

use thiserror::Error;

/// Errors that abort a load attempt. Either variant leaves any previously
/// loaded table untouched; downstream filtering, KPIs and charts are skipped
/// for the cycle.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source bytes could not be read as a spreadsheet.
    #[error("failed to read the spreadsheet: {0}")]
    Parse(String),

    /// A column required for derivation is missing from the source header.
    #[error("required column missing: {0}")]
    Schema(String),
}
