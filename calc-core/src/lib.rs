pub mod calculations;
pub mod error;
pub mod history;
pub mod models;
pub mod parse;
pub mod presentation;
pub mod store;

pub use error::ValidationError;
pub use history::History;
pub use models::*;
pub use presentation::{ChartSpec, Present, Report, ReportLine};
pub use store::repository::{KeyValueStore, StoreError};
