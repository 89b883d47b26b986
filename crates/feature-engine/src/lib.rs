//! Feature Engineering Engine
//!
//! Encodes vehicle attributes into the fixed 43-slot vector the price model
//! was trained on.

mod encoder;
mod error;
mod features;
mod one_hot;
mod schema;
mod severity;

pub use encoder::CategoricalEncoder;
pub use error::EncodingError;
pub use features::{FeatureAssembler, FeatureVector, VehicleFeatures, COLOR_CAPACITY, FEATURE_DIMENSION};
pub use one_hot::{one_hot, FUEL_LABELS, TRANSMISSION_LABELS};
pub use schema::FeatureSchema;
pub use severity::damage_severity;
