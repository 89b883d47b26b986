//! API Routes

pub mod dataset;
pub mod explain;
pub mod model;
pub mod options;
pub mod predict;
