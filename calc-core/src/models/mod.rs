mod sex;
mod unit_system;

pub use sex::Sex;
pub use unit_system::{CM_PER_INCH, KG_PER_LB, UnitSystem};
