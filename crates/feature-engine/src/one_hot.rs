//! One-hot expansion

/// Transmission labels, in model input order
pub const TRANSMISSION_LABELS: [&str; 3] = ["Düz", "Otomatik", "Yarı Otomatik"];

/// Fuel type labels, in model input order
pub const FUEL_LABELS: [&str; 5] = ["Benzin", "Dizel", "Elektrik", "Hibrit", "LPG & Benzin"];

/// Indicator vector with 1.0 where `labels` equals `value`.
///
/// A value outside the label list yields all zeros.
pub fn one_hot<S: AsRef<str>>(labels: &[S], value: &str) -> Vec<f64> {
    labels
        .iter()
        .map(|label| if label.as_ref() == value { 1.0 } else { 0.0 })
        .collect()
}
