//! Data Validator for Range Checking

use crate::cleaner::NumericField;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Model year valid range
    pub model_year_range: (f64, f64),
    /// Mileage valid range (km)
    pub mileage_range: (f64, f64),
    /// Engine displacement valid range (cc)
    pub displacement_range: (f64, f64),
    /// Engine power valid range (HP)
    pub power_range: (f64, f64),
    /// Annual tax valid range
    pub annual_tax_range: (f64, f64),
    /// Damage compensation valid range
    pub damage_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            model_year_range: (1990.0, 2024.0),
            mileage_range: (0.0, 1_000_000.0),
            displacement_range: (800.0, 6000.0),
            power_range: (50.0, 600.0),
            annual_tax_range: (0.0, 50_000.0),
            damage_range: (0.0, 1_000_000.0),
        }
    }
}

impl ValidationConfig {
    /// Configured range for a numeric field
    pub fn range(&self, field: NumericField) -> (f64, f64) {
        match field {
            NumericField::MileageKm => self.mileage_range,
            NumericField::ModelYear => self.model_year_range,
            NumericField::EngineDisplacementCc => self.displacement_range,
            NumericField::EnginePowerHp => self.power_range,
            NumericField::AnnualTaxAmount => self.annual_tax_range,
            NumericField::DamageCompensationAmount => self.damage_range,
        }
    }

    /// Check that every range is ordered and fits the type its field is stored as
    pub fn check(&self) -> Result<(), ValidationError> {
        for field in NumericField::ALL {
            let (min, max) = self.range(field);
            let (lowest, highest) = field.storage_bounds();
            // Written so NaN bounds fail too
            if !(min <= max && min >= lowest && max <= highest) {
                return Err(ValidationError::InvalidRange {
                    field: field.name(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }
}

/// Range validator for cleaned vehicle numerics
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Configured range for a numeric field
    pub fn range_for(&self, field: NumericField) -> (f64, f64) {
        self.config.range(field)
    }

    /// Validate a cleaned numeric field
    pub fn validate_field(&self, field: NumericField, value: f64) -> Result<(), ValidationError> {
        self.validate_range(field.name(), value, self.range_for(field))
    }

    /// Check several cleaned values at once, collecting every failure
    pub fn validate_all(&self, values: &[(NumericField, f64)]) -> ValidationResult {
        let errors: Vec<_> = values
            .iter()
            .filter_map(|&(field, value)| self.validate_field(field, value).err())
            .collect();

        if errors.is_empty() {
            ValidationResult::valid(values.len())
        } else {
            ValidationResult::invalid(errors, values.len())
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
