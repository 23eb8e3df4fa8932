//! The input modeling module provides the stochastic inputs of the queueing
//! models - interarrival times, service times, group sizes and route choices.
//! The module includes the random variable distributions used by the
//! stations and arrival processes, and the seeded uniform random number
//! generator that drives them.

pub mod random_variable;
pub mod uniform_rng;

pub use random_variable::Continuous as ContinuousRandomVariable;
pub use random_variable::Index as IndexRandomVariable;
pub use uniform_rng::UniformRNG;
