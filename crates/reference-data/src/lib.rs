//! Reference Data
//!
//! Loads the reference dataset of vehicle listings and derives the category
//! vocabulary the encoders are fitted on.

mod columns;
mod repository;
mod vocabulary;

pub use columns::ColumnMapping;
pub use repository::{DatasetSummary, OptionQuery, OptionSet, Repository, VehicleListing};
pub use vocabulary::ReferenceVocabulary;

use thiserror::Error;

/// Reference data errors
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("Dataset file not found: {0}")]
    DatasetNotFound(String),
    #[error("Dataset is missing column '{0}'")]
    MissingColumn(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("Dataset contains no usable rows")]
    Empty,
    #[error("Listing {0} not found")]
    NotFound(usize),
}

impl From<csv::Error> for ReferenceDataError {
    fn from(err: csv::Error) -> Self {
        ReferenceDataError::Csv(err.to_string())
    }
}
