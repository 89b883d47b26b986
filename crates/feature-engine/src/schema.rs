//! Feature slot names

use crate::features::{COLOR_CAPACITY, FEATURE_DIMENSION};
use crate::one_hot::{FUEL_LABELS, TRANSMISSION_LABELS};
use data_validator::NumericField;
use serde::Serialize;

/// Encoded categorical columns, in model input order
pub(crate) const ENCODED_FIELDS: [&str; 5] = ["brand", "series", "model", "body_type", "drivetrain_type"];

/// Names of the 43 model input slots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Schema for a given color vocabulary
    pub fn new<S: AsRef<str>>(colors: &[S]) -> Self {
        let mut names: Vec<String> = NumericField::ALL.iter().map(|f| f.name().to_string()).collect();
        names.extend(ENCODED_FIELDS.iter().map(|f| f.to_string()));
        names.push("damage_severity".to_string());
        names.extend(TRANSMISSION_LABELS.iter().map(|l| format!("transmission_{}", l)));
        names.extend(FUEL_LABELS.iter().map(|l| format!("fuel_{}", l)));
        names.extend(
            colors
                .iter()
                .take(COLOR_CAPACITY)
                .map(|c| format!("color_{}", c.as_ref())),
        );
        while names.len() < FEATURE_DIMENSION {
            names.push(format!("padding_{}", names.len()));
        }

        Self { names }
    }

    /// All slot names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of slot `index`
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Slot index of a named feature
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
