//! Numeric Cleaning

use crate::error::ValidationError;
use crate::input::{CategoricalField, NumericInput, RawVehicleInput, VehicleAttributes};
use crate::validator::Validator;
use tracing::debug;

/// Numeric fields of the vehicle form, in model input order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    MileageKm,
    ModelYear,
    EngineDisplacementCc,
    EnginePowerHp,
    AnnualTaxAmount,
    DamageCompensationAmount,
}

impl NumericField {
    /// All numeric fields in model input order
    pub const ALL: [NumericField; 6] = [
        NumericField::MileageKm,
        NumericField::ModelYear,
        NumericField::EngineDisplacementCc,
        NumericField::EnginePowerHp,
        NumericField::AnnualTaxAmount,
        NumericField::DamageCompensationAmount,
    ];

    /// Field name used in errors and feature names
    pub fn name(&self) -> &'static str {
        match self {
            NumericField::MileageKm => "mileage_km",
            NumericField::ModelYear => "model_year",
            NumericField::EngineDisplacementCc => "engine_displacement_cc",
            NumericField::EnginePowerHp => "engine_power_hp",
            NumericField::AnnualTaxAmount => "annual_tax_amount",
            NumericField::DamageCompensationAmount => "damage_compensation_amount",
        }
    }

    /// Substitute used when the input is missing or unparseable
    pub fn default_value(&self) -> f64 {
        match self {
            NumericField::MileageKm => 100_000.0,
            NumericField::ModelYear => 2020.0,
            NumericField::EngineDisplacementCc => 1600.0,
            NumericField::EnginePowerHp => 120.0,
            NumericField::AnnualTaxAmount => 2000.0,
            NumericField::DamageCompensationAmount => 0.0,
        }
    }

    /// Smallest and largest value the cleaned attribute can hold
    pub fn storage_bounds(&self) -> (f64, f64) {
        match self {
            NumericField::MileageKm | NumericField::EngineDisplacementCc | NumericField::EnginePowerHp => {
                (0.0, u32::MAX as f64)
            }
            NumericField::ModelYear => (i32::MIN as f64, i32::MAX as f64),
            NumericField::AnnualTaxAmount | NumericField::DamageCompensationAmount => {
                (f64::NEG_INFINITY, f64::INFINITY)
            }
        }
    }

    /// Read this field from cleaned attributes
    pub fn of(&self, attributes: &VehicleAttributes) -> f64 {
        match self {
            NumericField::MileageKm => attributes.mileage_km as f64,
            NumericField::ModelYear => attributes.model_year as f64,
            NumericField::EngineDisplacementCc => attributes.engine_displacement_cc as f64,
            NumericField::EnginePowerHp => attributes.engine_power_hp as f64,
            NumericField::AnnualTaxAmount => attributes.annual_tax_amount,
            NumericField::DamageCompensationAmount => attributes.damage_compensation_amount,
        }
    }

    fn raw<'a>(&self, input: &'a RawVehicleInput) -> Option<&'a NumericInput> {
        match self {
            NumericField::MileageKm => input.mileage_km.as_ref(),
            NumericField::ModelYear => input.model_year.as_ref(),
            NumericField::EngineDisplacementCc => input.engine_displacement_cc.as_ref(),
            NumericField::EnginePowerHp => input.engine_power_hp.as_ref(),
            NumericField::AnnualTaxAmount => input.annual_tax_amount.as_ref(),
            NumericField::DamageCompensationAmount => input.damage_compensation_amount.as_ref(),
        }
    }
}

/// Parse a number written with dot thousands separators and a comma decimal mark.
///
/// Everything except ASCII digits, `.` and `,` is discarded first, so unit
/// suffixes ("1.598 cc") and signs are ignored. Returns `None` when nothing
/// numeric remains or the remainder does not parse.
pub fn parse_localized(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if kept.is_empty() {
        return None;
    }

    let normalized = kept.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a reference dataset cell.
///
/// Machine-written decimals ("2500.0", "786610.0") are read as is. A single
/// dot followed by exactly three digits ("50.000") is a thousands separator,
/// as is anything else `parse_localized` accepts ("1.598 cc", "150.000,5").
pub fn parse_dataset_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if is_plain_decimal(text) {
        text.parse::<f64>().ok().filter(|v| v.is_finite())
    } else {
        parse_localized(text)
    }
}

fn is_plain_decimal(text: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let unsigned = text.strip_prefix('-').unwrap_or(text);

    match unsigned.split_once('.') {
        None => all_digits(unsigned),
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction) && fraction.len() != 3,
    }
}

/// Clean a single numeric value, substituting `default` when unusable
pub fn clean_numeric(value: Option<&NumericInput>, default: f64) -> f64 {
    match value {
        Some(NumericInput::Number(v)) if v.is_finite() => *v,
        Some(NumericInput::Text(text)) => parse_localized(text).unwrap_or(default),
        _ => default,
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Clean and validate a raw form into `VehicleAttributes`.
///
/// All fields are checked before returning; a single failure is returned as
/// is, several are wrapped in `ValidationError::Rejected`.
pub fn clean_input(
    input: &RawVehicleInput,
    validator: &Validator,
) -> Result<VehicleAttributes, ValidationError> {
    let numeric = NumericField::ALL.map(|field| {
        (field, clean_numeric(field.raw(input), field.default_value()))
    });
    let mut errors = validator.validate_all(&numeric).errors;

    let mut cleaned = Vec::with_capacity(CategoricalField::ALL.len());
    for field in CategoricalField::ALL {
        match required(field.name(), field.of_raw(input)) {
            Ok(v) => cleaned.push(v),
            Err(e) => {
                errors.push(e);
                cleaned.push(String::new());
            }
        }
    }

    match errors.len() {
        0 => {}
        1 => return Err(errors.remove(0)),
        _ => return Err(ValidationError::Rejected(errors)),
    }

    let [mileage, year, displacement, power, tax, damage] = numeric.map(|(_, value)| value);
    // Same order as CategoricalField::ALL
    let mut cleaned = cleaned.into_iter();
    let mut next = || cleaned.next().unwrap_or_default();

    let attributes = VehicleAttributes {
        mileage_km: mileage.round() as u32,
        model_year: year.round() as i32,
        engine_displacement_cc: displacement.round() as u32,
        engine_power_hp: power.round() as u32,
        annual_tax_amount: tax,
        damage_compensation_amount: damage,
        brand: next(),
        series: next(),
        model: next(),
        transmission_type: next(),
        fuel_type: next(),
        body_type: next(),
        color: next(),
        drivetrain_type: next(),
        paint_condition: input.paint_condition,
    };

    debug!(
        "Cleaned input: {} {} {} ({}), {} km",
        attributes.brand, attributes.series, attributes.model, attributes.model_year, attributes.mileage_km
    );

    Ok(attributes)
}
