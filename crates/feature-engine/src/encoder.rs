//! Label encoding for categorical fields

use crate::error::EncodingError;
use std::collections::BTreeSet;

/// Maps each category to its position in the sorted list of fitted values
#[derive(Debug, Clone)]
pub struct CategoricalEncoder {
    /// Field name reported in errors
    field: &'static str,
    /// Fitted classes, sorted ascending
    classes: Vec<String>,
}

impl CategoricalEncoder {
    /// Fit an encoder on the values observed for a field
    pub fn fit<I, S>(field: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
        Self {
            field,
            classes: classes.into_iter().collect(),
        }
    }

    /// Zero-based index of `value` among the fitted classes
    pub fn encode(&self, value: &str) -> Result<usize, EncodingError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map_err(|_| EncodingError::UnseenCategory {
                field: self.field,
                value: value.to_string(),
            })
    }

    /// Class at `index`
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Fitted classes in index order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of fitted classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether nothing was fitted
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Field this encoder was fitted for
    pub fn field(&self) -> &'static str {
        self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sorted_indices() {
        let encoder = CategoricalEncoder::fit("brand", ["Toyota", "BMW", "Renault", "BMW"]);
        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.encode("BMW"), Ok(0));
        assert_eq!(encoder.encode("Renault"), Ok(1));
        assert_eq!(encoder.encode("Toyota"), Ok(2));
        assert_eq!(encoder.decode(2), Some("Toyota"));
    }

    #[test]
    fn test_unseen_category() {
        let encoder = CategoricalEncoder::fit("brand", ["Toyota"]);
        assert_eq!(
            encoder.encode("Tesla"),
            Err(EncodingError::UnseenCategory {
                field: "brand",
                value: "Tesla".to_string()
            })
        );
    }

    #[test]
    fn test_non_ascii_order() {
        // Byte order puts 'Ö' after every ASCII letter
        let encoder = CategoricalEncoder::fit("drivetrain_type", ["Önden Çekiş", "Arkadan İtiş", "4WD (Sürekli)"]);
        assert_eq!(encoder.classes(), &["4WD (Sürekli)", "Arkadan İtiş", "Önden Çekiş"]);
    }

    proptest! {
        #[test]
        fn prop_fitted_values_encode_in_range(values in proptest::collection::vec("[a-zA-Z0-9 ]{1,8}", 1..40)) {
            let encoder = CategoricalEncoder::fit("model", &values);
            for value in &values {
                let index = encoder.encode(value).unwrap();
                prop_assert!(index < encoder.len());
                prop_assert_eq!(encoder.decode(index), Some(value.as_str()));
                prop_assert_eq!(encoder.encode(value).unwrap(), index);
            }
        }
    }
}
