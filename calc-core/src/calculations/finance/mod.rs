//! Money-valued calculators. All amounts are [`Decimal`](rust_decimal::Decimal)
//! rounded to cents half away from zero.

pub mod interest;
pub mod mortgage;
pub mod real_estate;
pub mod rmd;

pub use interest::{CompoundFrequency, InterestInput, InterestKind, InterestResult, YearBalance};
pub use mortgage::{AmortizationRow, MortgageInput, MortgageResult};
pub use real_estate::{RealEstateInput, RealEstateResult};
pub use rmd::{RmdInput, RmdProjectionRow, RmdResult, distribution_period};
