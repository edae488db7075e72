pub mod confidence;

pub use confidence::{ConfidenceInput, ConfidenceLevel, ConfidenceResult};
