pub mod btu;
pub mod landscape;

pub use btu::{BtuInput, BtuResult, SunExposure};
pub use landscape::{AreaShape, LandscapeInput, LandscapeResult, Material, MaterialSpec};
