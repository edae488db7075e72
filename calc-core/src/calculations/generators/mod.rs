//! Non-deterministic generators. Every entry point takes the random source
//! as a parameter (`R: Rng + ?Sized`), so tests drive them from a seeded
//! `StdRng`. The convenience methods draw from `thread_rng()`.

pub mod password;
pub mod random;

pub use password::{GeneratedPassword, PasswordOptions, Strength};
pub use random::{Distribution, RandomInput, RandomResult};
