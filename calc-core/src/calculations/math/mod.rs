//! Number-theory, algebra and arithmetic calculators.

pub mod gcd_lcm;
pub mod percentage;
pub mod primes;
pub mod quadratic;
pub mod rounding;
pub mod scientific;

pub use gcd_lcm::{GcdLcmCalculator, GcdLcmResult, gcd, lcm};
pub use percentage::{ChangeDirection, PercentageQuery, PercentageResult};
pub use primes::{factorize, is_prime};
pub use quadratic::{QuadraticInput, QuadraticResult, QuadraticRoots};
pub use rounding::{RoundingInput, RoundingMode, RoundingRequest, RoundingResult};
pub use scientific::{AngleMode, ScientificCalculator};
