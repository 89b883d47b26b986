//! Feature Vector Assembly

use crate::encoder::CategoricalEncoder;
use crate::error::EncodingError;
use crate::one_hot::{one_hot, FUEL_LABELS, TRANSMISSION_LABELS};
use crate::schema::{FeatureSchema, ENCODED_FIELDS};
use crate::severity::damage_severity;
use data_validator::{CategoricalField, NumericField, VehicleAttributes};
use reference_data::ReferenceVocabulary;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of features the price model expects
pub const FEATURE_DIMENSION: usize = 43;

/// Slots before the color indicators: 6 numeric, 5 codes, severity, 3 transmission, 5 fuel
const COLOR_OFFSET: usize = 20;

/// Color indicators that fit before the vector is full
pub const COLOR_CAPACITY: usize = FEATURE_DIMENSION - COLOR_OFFSET;

/// Positional model input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Raw feature values (43 dimensions)
    pub values: Vec<f64>,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: vec![0.0; FEATURE_DIMENSION],
        }
    }
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values narrowed to f32 for the model runtime
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}

/// Encoded features by name, before positional layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleFeatures {
    pub mileage_km: f64,
    pub model_year: f64,
    pub engine_displacement_cc: f64,
    pub engine_power_hp: f64,
    pub annual_tax_amount: f64,
    pub damage_compensation_amount: f64,

    pub brand_code: usize,
    pub series_code: usize,
    pub model_code: usize,
    pub body_type_code: usize,
    pub drivetrain_code: usize,

    /// 0, 1 or 2
    pub damage_severity: u8,

    pub transmission: Vec<f64>,
    pub fuel: Vec<f64>,
    pub color: Vec<f64>,
}

impl VehicleFeatures {
    /// Lay the features out in model input order, zero-padded to 43 slots.
    ///
    /// This is the only place the positional order is defined; `FeatureSchema`
    /// names the same slots.
    pub fn to_feature_vector(&self) -> FeatureVector {
        let mut values = Vec::with_capacity(FEATURE_DIMENSION);

        values.extend([
            self.mileage_km,
            self.model_year,
            self.engine_displacement_cc,
            self.engine_power_hp,
            self.annual_tax_amount,
            self.damage_compensation_amount,
        ]);
        values.extend(
            [
                self.brand_code,
                self.series_code,
                self.model_code,
                self.body_type_code,
                self.drivetrain_code,
            ]
            .map(|code| code as f64),
        );
        values.push(self.damage_severity as f64);
        values.extend(&self.transmission);
        values.extend(&self.fuel);
        values.extend(&self.color);

        values.resize(FEATURE_DIMENSION, 0.0);
        FeatureVector { values }
    }
}

/// Encoders fitted on the reference vocabulary
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    brand: CategoricalEncoder,
    series: CategoricalEncoder,
    model: CategoricalEncoder,
    body_type: CategoricalEncoder,
    drivetrain: CategoricalEncoder,
    /// Color labels in indicator order
    colors: Vec<String>,
}

impl FeatureAssembler {
    /// Fit every encoder on the reference vocabulary
    pub fn fit(vocabulary: &ReferenceVocabulary) -> Self {
        let encoder = |field: CategoricalField| CategoricalEncoder::fit(field.name(), vocabulary.values(field));

        let mut colors = vocabulary.values(CategoricalField::Color).to_vec();
        if colors.len() > COLOR_CAPACITY {
            warn!(
                "{} colors in vocabulary, only the first {} get indicator slots",
                colors.len(),
                COLOR_CAPACITY
            );
            colors.truncate(COLOR_CAPACITY);
        }

        let assembler = Self {
            brand: encoder(CategoricalField::Brand),
            series: encoder(CategoricalField::Series),
            model: encoder(CategoricalField::Model),
            body_type: encoder(CategoricalField::BodyType),
            drivetrain: encoder(CategoricalField::DrivetrainType),
            colors,
        };

        debug!(
            "Feature assembler fitted: {} brands, {} series, {} models, {} colors",
            assembler.brand.len(),
            assembler.series.len(),
            assembler.model.len(),
            assembler.colors.len()
        );

        assembler
    }

    /// Encode attributes into named features
    pub fn features(&self, attributes: &VehicleAttributes) -> Result<VehicleFeatures, EncodingError> {
        let [mileage_km, model_year, engine_displacement_cc, engine_power_hp, annual_tax_amount, damage_compensation_amount] =
            NumericField::ALL.map(|field| field.of(attributes));

        Ok(VehicleFeatures {
            mileage_km,
            model_year,
            engine_displacement_cc,
            engine_power_hp,
            annual_tax_amount,
            damage_compensation_amount,
            brand_code: self.brand.encode(&attributes.brand)?,
            series_code: self.series.encode(&attributes.series)?,
            model_code: self.model.encode(&attributes.model)?,
            body_type_code: self.body_type.encode(&attributes.body_type)?,
            drivetrain_code: self.drivetrain.encode(&attributes.drivetrain_type)?,
            damage_severity: damage_severity(attributes.paint_condition),
            transmission: one_hot(&TRANSMISSION_LABELS, &attributes.transmission_type),
            fuel: one_hot(&FUEL_LABELS, &attributes.fuel_type),
            color: one_hot(&self.colors, &attributes.color),
        })
    }

    /// Encode attributes straight into the positional model input
    pub fn assemble(&self, attributes: &VehicleAttributes) -> Result<FeatureVector, EncodingError> {
        let vector = self.features(attributes)?.to_feature_vector();
        debug!(
            "Assembled {} features for {} {} {}",
            vector.len(),
            attributes.brand,
            attributes.series,
            attributes.model
        );
        Ok(vector)
    }

    /// Slot names matching `assemble` output
    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::new(&self.colors)
    }

    /// Color labels with indicator slots
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Encoder for one of the label-encoded fields
    pub fn encoder(&self, field: &str) -> Option<&CategoricalEncoder> {
        [&self.brand, &self.series, &self.model, &self.body_type, &self.drivetrain]
            .into_iter()
            .zip(ENCODED_FIELDS)
            .find(|(_, name)| *name == field)
            .map(|(encoder, _)| encoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::PaintCondition;
    use proptest::prelude::*;

    fn vocabulary() -> ReferenceVocabulary {
        ReferenceVocabulary::default()
            .with_values(CategoricalField::Brand, ["Toyota", "Renault", "BMW"])
            .with_values(CategoricalField::Series, ["Corolla", "Clio", "3 Serisi"])
            .with_values(CategoricalField::Model, ["1.6", "1.0 TCe", "320i"])
            .with_values(CategoricalField::BodyType, ["Sedan", "Hatchback"])
            .with_values(CategoricalField::DrivetrainType, ["Önden Çekiş", "Arkadan İtiş"])
            .with_values(CategoricalField::Color, ["Beyaz", "Siyah", "Gri"])
    }

    fn corolla() -> VehicleAttributes {
        VehicleAttributes {
            mileage_km: 50_000,
            model_year: 2020,
            engine_displacement_cc: 1600,
            engine_power_hp: 120,
            annual_tax_amount: 2000.0,
            damage_compensation_amount: 0.0,
            brand: "Toyota".into(),
            series: "Corolla".into(),
            model: "1.6".into(),
            transmission_type: "Otomatik".into(),
            fuel_type: "Benzin".into(),
            body_type: "Sedan".into(),
            color: "Gri".into(),
            drivetrain_type: "Önden Çekiş".into(),
            paint_condition: PaintCondition::Original,
        }
    }

    #[test]
    fn test_end_to_end_layout() {
        let assembler = FeatureAssembler::fit(&vocabulary());
        let vector = assembler.assemble(&corolla()).unwrap();

        assert_eq!(vector.len(), FEATURE_DIMENSION);
        assert_eq!(&vector.values[..6], &[50000.0, 2020.0, 1600.0, 120.0, 2000.0, 0.0]);
        // BMW, Renault, Toyota
        assert_eq!(vector.values[6], 2.0);
        // 3 Serisi, Clio, Corolla
        assert_eq!(vector.values[7], 2.0);
        assert_eq!(vector.values[11], 0.0);
        assert_eq!(&vector.values[12..15], &[0.0, 1.0, 0.0]);
        assert_eq!(&vector.values[15..20], &[1.0, 0.0, 0.0, 0.0, 0.0]);
        // Beyaz, Gri, Siyah
        assert_eq!(&vector.values[20..23], &[0.0, 1.0, 0.0]);
        assert!(vector.values[23..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unseen_brand_rejected() {
        let assembler = FeatureAssembler::fit(&vocabulary());
        let attributes = VehicleAttributes {
            brand: "Tesla".into(),
            ..corolla()
        };
        assert_eq!(
            assembler.assemble(&attributes),
            Err(EncodingError::UnseenCategory {
                field: "brand",
                value: "Tesla".into()
            })
        );
    }

    #[test]
    fn test_uncommon_fuel_all_zero() {
        let assembler = FeatureAssembler::fit(&vocabulary());
        let attributes = VehicleAttributes {
            fuel_type: "Hidrojen".into(),
            paint_condition: PaintCondition::Replaced,
            ..corolla()
        };
        let vector = assembler.assemble(&attributes).unwrap();
        assert_eq!(vector.values[11], 2.0);
        assert!(vector.values[15..20].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_schema_matches_vector() {
        let assembler = FeatureAssembler::fit(&vocabulary());
        let schema = assembler.schema();
        let vector = assembler.assemble(&corolla()).unwrap();

        assert_eq!(schema.len(), vector.len());
        let gri = schema.position("color_Gri").unwrap();
        assert_eq!(vector.values[gri], 1.0);
        let year = schema.position("model_year").unwrap();
        assert_eq!(vector.values[year], 2020.0);
    }

    #[test]
    fn test_encoder_lookup() {
        let assembler = FeatureAssembler::fit(&vocabulary());
        assert_eq!(assembler.encoder("body_type").map(|e| e.len()), Some(2));
        assert!(assembler.encoder("color").is_none());
    }

    proptest! {
        #[test]
        fn prop_vector_length_fixed(color_count in 0usize..60, pick in 0usize..60) {
            let colors: Vec<String> = (0..color_count).map(|i| format!("renk{:02}", i)).collect();
            let vocabulary = vocabulary().with_values(CategoricalField::Color, &colors);
            let assembler = FeatureAssembler::fit(&vocabulary);

            let attributes = VehicleAttributes {
                color: format!("renk{:02}", pick),
                ..corolla()
            };
            let vector = assembler.assemble(&attributes).unwrap();
            prop_assert_eq!(vector.len(), FEATURE_DIMENSION);

            let color_sum: f64 = vector.values[COLOR_OFFSET..].iter().sum();
            let expected = if pick < color_count.min(COLOR_CAPACITY) { 1.0 } else { 0.0 };
            prop_assert_eq!(color_sum, expected);
        }
    }
}
