//! Category vocabulary derived from the reference dataset

use crate::repository::VehicleListing;
use data_validator::CategoricalField;
use std::collections::{BTreeSet, HashMap};

/// Sorted distinct values per categorical field.
///
/// Built once from the reference dataset and never mutated afterwards; it is
/// both the list of selectable options and the fitting domain of the encoders.
#[derive(Debug, Clone, Default)]
pub struct ReferenceVocabulary {
    values: HashMap<CategoricalField, Vec<String>>,
}

impl ReferenceVocabulary {
    /// Collect the vocabulary from dataset listings, skipping empty cells
    pub fn from_listings(listings: &[VehicleListing]) -> Self {
        CategoricalField::ALL
            .into_iter()
            .fold(Self::default(), |vocabulary, field| {
                vocabulary.with_values(
                    field,
                    listings.iter().map(|l| field.of_raw(&l.input)),
                )
            })
    }

    /// Replace the values of one field (sorted, deduplicated, blanks dropped)
    pub fn with_values<I, S>(mut self, field: CategoricalField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        self.values.insert(field, distinct.into_iter().collect());
        self
    }

    /// Sorted values for a field
    pub fn values(&self, field: CategoricalField) -> &[String] {
        self.values.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `value` was observed for `field`
    pub fn contains(&self, field: CategoricalField, value: &str) -> bool {
        self.values(field)
            .binary_search_by(|v| v.as_str().cmp(value))
            .is_ok()
    }

    /// Number of distinct values for a field
    pub fn len(&self, field: CategoricalField) -> usize {
        self.values(field).len()
    }
}
