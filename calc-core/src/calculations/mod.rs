//! Calculator kernels.
//!
//! Each submodule holds a group of independent calculators. Every kernel is a
//! pure function of its input record (the generators excepted) and reports
//! bad input as a [`ValidationError`](crate::ValidationError).

pub mod common;
pub mod finance;
pub mod generators;
pub mod health;
pub mod home;
pub mod math;
pub mod stats;
pub mod time;
