//! Baseline drivers for the environment
//!
//! The engine never chooses its own moves; these policies are reference
//! callers for the watch and run modes. They only use the public driver
//! interface (accessors plus `is_collision` lookahead), so anything an
//! external agent can see, they can see.

pub mod base;
pub mod greedy;
pub mod random;

pub use base::Policy;
pub use greedy::GreedyPolicy;
pub use random::RandomPolicy;
