//! Dataset column remapping

use data_validator::{CategoricalField, NumericField};
use serde::{Deserialize, Serialize};

/// Maps each vehicle field to the CSV header it is read from.
///
/// The defaults match the published listings file, whose `kilometre(Km)` and
/// `yıl` headers are swapped relative to their contents and whose damage
/// payout column is named `hasarGecmisi`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub brand: String,
    pub series: String,
    pub model: String,
    pub transmission_type: String,
    pub fuel_type: String,
    pub body_type: String,
    pub color: String,
    pub drivetrain_type: String,

    pub mileage_km: String,
    pub model_year: String,
    pub engine_displacement_cc: String,
    pub engine_power_hp: String,
    pub annual_tax_amount: String,
    pub damage_compensation_amount: String,

    /// Optional paint condition column
    pub paint_condition: Option<String>,
    /// Optional listing price column
    pub price: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            brand: "marka".into(),
            series: "seri".into(),
            model: "model".into(),
            transmission_type: "vitesTipi".into(),
            fuel_type: "yakitTuru".into(),
            body_type: "kasaTipi".into(),
            color: "renk".into(),
            drivetrain_type: "cekisTipi".into(),

            mileage_km: "yıl".into(),
            model_year: "kilometre(Km)".into(),
            engine_displacement_cc: "motorHacmi(Cc)".into(),
            engine_power_hp: "motorGucu(HP)".into(),
            annual_tax_amount: "aracVergisi(TRY)".into(),
            damage_compensation_amount: "hasarGecmisi".into(),

            paint_condition: None,
            price: Some("fiyat".into()),
        }
    }
}

impl ColumnMapping {
    /// Header for a categorical field
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Brand => &self.brand,
            CategoricalField::Series => &self.series,
            CategoricalField::Model => &self.model,
            CategoricalField::TransmissionType => &self.transmission_type,
            CategoricalField::FuelType => &self.fuel_type,
            CategoricalField::BodyType => &self.body_type,
            CategoricalField::Color => &self.color,
            CategoricalField::DrivetrainType => &self.drivetrain_type,
        }
    }

    /// Header for a numeric field
    pub fn numeric(&self, field: NumericField) -> &str {
        match field {
            NumericField::MileageKm => &self.mileage_km,
            NumericField::ModelYear => &self.model_year,
            NumericField::EngineDisplacementCc => &self.engine_displacement_cc,
            NumericField::EnginePowerHp => &self.engine_power_hp,
            NumericField::AnnualTaxAmount => &self.annual_tax_amount,
            NumericField::DamageCompensationAmount => &self.damage_compensation_amount,
        }
    }
}
