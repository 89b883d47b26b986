//! Data Validation and Cleaning
//!
//! Turns raw vehicle form input into cleaned, range-checked `VehicleAttributes`.
//! Numeric fields accept localized strings ("150.000,5") and fall back to
//! per-field defaults when missing or unparseable.

mod cleaner;
mod error;
mod input;
mod validator;

pub use cleaner::{clean_input, clean_numeric, parse_dataset_number, parse_localized, NumericField};
pub use error::ValidationError;
pub use input::{CategoricalField, NumericInput, PaintCondition, RawVehicleInput, VehicleAttributes};
pub use validator::{ValidationConfig, ValidationResult, Validator};
