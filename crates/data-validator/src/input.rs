//! Raw and cleaned vehicle records

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A numeric form value as it arrives on the wire.
///
/// Deserialization never fails: booleans, arrays and objects become
/// `Unusable` and are cleaned to the field default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// Plain JSON number
    Number(f64),
    /// Free text, possibly using comma decimals and dot thousands separators
    Text(String),
    /// Any other JSON value
    Unusable,
}

struct NumericInputVisitor;

impl<'de> Visitor<'de> for NumericInputVisitor {
    type Value = NumericInput;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or numeric text")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(NumericInput::Number(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(NumericInput::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(NumericInput::Number(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(NumericInput::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(NumericInput::Text(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(NumericInput::Unusable)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NumericInput::Unusable)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NumericInput::Unusable)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        skip_seq(seq)?;
        Ok(NumericInput::Unusable)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        skip_map(map)?;
        Ok(NumericInput::Unusable)
    }
}

impl<'de> Deserialize<'de> for NumericInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericInputVisitor)
    }
}

fn skip_seq<'de, A: SeqAccess<'de>>(mut seq: A) -> Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

fn skip_map<'de, A: MapAccess<'de>>(mut map: A) -> Result<(), A::Error> {
    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(())
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

/// Paint and body-part condition reported for the vehicle.
///
/// Deserializes from the English variant name or the dataset label. Anything
/// else, including `null`, is `Unspecified`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PaintCondition {
    /// Factory paint, no defects
    Original,
    /// Locally repainted spots
    LocalPaint,
    /// Repainted panels
    Painted,
    /// Replaced panels
    Replaced,
    /// Not stated by the seller
    #[default]
    Unspecified,
}

struct PaintConditionVisitor;

impl<'de> Visitor<'de> for PaintConditionVisitor {
    type Value = PaintCondition;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a paint condition label")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PaintCondition::from_label(v).unwrap_or_else(|| {
            debug!("Unknown paint condition '{}', using Unspecified", v);
            PaintCondition::Unspecified
        }))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(PaintCondition::Unspecified)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(PaintCondition::Unspecified)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(PaintCondition::Unspecified)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(PaintCondition::Unspecified)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PaintCondition::Unspecified)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PaintCondition::Unspecified)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        skip_seq(seq)?;
        Ok(PaintCondition::Unspecified)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        skip_map(map)?;
        Ok(PaintCondition::Unspecified)
    }
}

impl<'de> Deserialize<'de> for PaintCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PaintConditionVisitor)
    }
}

impl PaintCondition {
    /// Every condition in form order
    pub const ALL: [PaintCondition; 5] = [
        PaintCondition::Original,
        PaintCondition::LocalPaint,
        PaintCondition::Painted,
        PaintCondition::Replaced,
        PaintCondition::Unspecified,
    ];

    /// Label used by the reference dataset and the original form
    pub fn label(&self) -> &'static str {
        match self {
            PaintCondition::Original => "Orjinal (Hatasız)",
            PaintCondition::LocalPaint => "Lokal Boyalı",
            PaintCondition::Painted => "Boyalı",
            PaintCondition::Replaced => "Değişmiş",
            PaintCondition::Unspecified => "Belirtilmemiş",
        }
    }

    /// Parse either the dataset label or the English variant name
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == label || format!("{:?}", c) == label)
    }
}

/// Categorical fields of the vehicle form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Brand,
    Series,
    Model,
    TransmissionType,
    FuelType,
    BodyType,
    Color,
    DrivetrainType,
}

impl CategoricalField {
    /// All categorical fields in form order
    pub const ALL: [CategoricalField; 8] = [
        CategoricalField::Brand,
        CategoricalField::Series,
        CategoricalField::Model,
        CategoricalField::TransmissionType,
        CategoricalField::FuelType,
        CategoricalField::BodyType,
        CategoricalField::Color,
        CategoricalField::DrivetrainType,
    ];

    /// Field name used in errors and feature names
    pub fn name(&self) -> &'static str {
        match self {
            CategoricalField::Brand => "brand",
            CategoricalField::Series => "series",
            CategoricalField::Model => "model",
            CategoricalField::TransmissionType => "transmission_type",
            CategoricalField::FuelType => "fuel_type",
            CategoricalField::BodyType => "body_type",
            CategoricalField::Color => "color",
            CategoricalField::DrivetrainType => "drivetrain_type",
        }
    }

    /// Read this field from cleaned attributes
    pub fn of<'a>(&self, attributes: &'a VehicleAttributes) -> &'a str {
        match self {
            CategoricalField::Brand => &attributes.brand,
            CategoricalField::Series => &attributes.series,
            CategoricalField::Model => &attributes.model,
            CategoricalField::TransmissionType => &attributes.transmission_type,
            CategoricalField::FuelType => &attributes.fuel_type,
            CategoricalField::BodyType => &attributes.body_type,
            CategoricalField::Color => &attributes.color,
            CategoricalField::DrivetrainType => &attributes.drivetrain_type,
        }
    }

    /// Read this field from a raw form
    pub fn of_raw<'a>(&self, input: &'a RawVehicleInput) -> &'a str {
        match self {
            CategoricalField::Brand => &input.brand,
            CategoricalField::Series => &input.series,
            CategoricalField::Model => &input.model,
            CategoricalField::TransmissionType => &input.transmission_type,
            CategoricalField::FuelType => &input.fuel_type,
            CategoricalField::BodyType => &input.body_type,
            CategoricalField::Color => &input.color,
            CategoricalField::DrivetrainType => &input.drivetrain_type,
        }
    }
}

/// Vehicle form as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVehicleInput {
    pub mileage_km: Option<NumericInput>,
    pub model_year: Option<NumericInput>,
    pub engine_displacement_cc: Option<NumericInput>,
    pub engine_power_hp: Option<NumericInput>,
    pub annual_tax_amount: Option<NumericInput>,
    pub damage_compensation_amount: Option<NumericInput>,

    pub brand: String,
    pub series: String,
    pub model: String,
    pub transmission_type: String,
    pub fuel_type: String,
    pub body_type: String,
    pub color: String,
    pub drivetrain_type: String,

    pub paint_condition: PaintCondition,
}

/// Cleaned and range-checked vehicle record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleAttributes {
    /// Odometer reading (km)
    pub mileage_km: u32,
    /// Model year
    pub model_year: i32,
    /// Engine displacement (cc)
    pub engine_displacement_cc: u32,
    /// Engine power (HP)
    pub engine_power_hp: u32,
    /// Yearly motor vehicle tax
    pub annual_tax_amount: f64,
    /// Recorded insurance damage payout, 0 when none
    pub damage_compensation_amount: f64,

    pub brand: String,
    pub series: String,
    pub model: String,
    pub transmission_type: String,
    pub fuel_type: String,
    pub body_type: String,
    pub color: String,
    pub drivetrain_type: String,

    pub paint_condition: PaintCondition,
}
