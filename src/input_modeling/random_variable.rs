//! Random variables drive the stochastic behavior of the queueing models.
//! Durations (interarrival and service times) are `Continuous` random
//! variables, and discrete choices (group sizes, routes) are `Index` random
//! variables.  Deterministic behavior is a random variable with a single
//! point - for example, `Uniform { min: 0.0, max: 0.0 }` is a zero-duration
//! service.

use rand::distributions::Distribution;
use serde::{Deserialize, Serialize};
use rand_distr::{Exp, Uniform, WeightedIndex};

use super::UniformRNG;
use crate::utils::errors::SimulationError;
use crate::utils::is_probability_vector;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Continuous {
    /// Exponential distribution with rate `lambda` (mean `1 / lambda`)
    Exp { lambda: f64 },
    /// Range is inclusive of both bounds: [min, max]
    Uniform { min: f64, max: f64 },
    /// Sum of `shape` independent exponentials, each with mean
    /// `mean / shape`.  Shape 2 gives the Erlang-2 service times of the job
    /// shop - less variable than an exponential of the same mean.
    Erlang { shape: u32, mean: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Index {
    /// Range is inclusive of min, exclusive of max: [min, max)
    Uniform { min: usize, max: usize },
    /// Weights are a probability vector, one weight per index
    WeightedIndex { weights: Vec<f64> },
}

impl Continuous {
    /// The generation of random variates drives stochastic behaviors during
    /// simulation execution.  This function requires the random number
    /// generator of the simulation, and produces a f64 random variate.
    pub fn random_variate(&self, uniform_rng: &mut UniformRNG) -> Result<f64, SimulationError> {
        match self {
            Continuous::Exp { lambda } => Ok(Exp::new(*lambda)?.sample(uniform_rng.rng())),
            Continuous::Uniform { min, max } => {
                self.validate()?;
                Ok(Uniform::new_inclusive(*min, *max).sample(uniform_rng.rng()))
            }
            Continuous::Erlang { shape, mean } => {
                self.validate()?;
                let phase = Exp::new(f64::from(*shape) / *mean)?;
                Ok((0..*shape).map(|_| phase.sample(uniform_rng.rng())).sum())
            }
        }
    }

    /// Durations must be non-negative and every parameter finite.  The
    /// check runs at configuration time, so a malformed distribution never
    /// reaches the run loop.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let valid = match self {
            Continuous::Exp { lambda } => lambda.is_finite() && *lambda > 0.0,
            Continuous::Uniform { min, max } => {
                min.is_finite() && max.is_finite() && *min >= 0.0 && min <= max
            }
            Continuous::Erlang { shape, mean } => *shape > 0 && mean.is_finite() && *mean > 0.0,
        };
        if valid {
            Ok(())
        } else {
            Err(SimulationError::InvalidModelConfiguration(format![
                "invalid duration distribution {:?}",
                self
            ]))
        }
    }

    /// The expected value of the distribution.
    pub fn mean(&self) -> f64 {
        match self {
            Continuous::Exp { lambda } => 1.0 / lambda,
            Continuous::Uniform { min, max } => (min + max) / 2.0,
            Continuous::Erlang { mean, .. } => *mean,
        }
    }

    /// A copy of the distribution with every duration divided by `factor` -
    /// the effect of adding staff to a station that works one queue.
    pub fn scaled_down(&self, factor: f64) -> Self {
        match self {
            Continuous::Exp { lambda } => Continuous::Exp {
                lambda: lambda * factor,
            },
            Continuous::Uniform { min, max } => Continuous::Uniform {
                min: min / factor,
                max: max / factor,
            },
            Continuous::Erlang { shape, mean } => Continuous::Erlang {
                shape: *shape,
                mean: mean / factor,
            },
        }
    }
}

impl Index {
    /// The generation of random variates drives stochastic behaviors during
    /// simulation execution.  This function requires the random number
    /// generator of the simulation, and produces a usize random variate.
    pub fn random_variate(&self, uniform_rng: &mut UniformRNG) -> Result<usize, SimulationError> {
        match self {
            Index::Uniform { min, max } => {
                self.validate()?;
                Ok(Uniform::new(*min, *max).sample(uniform_rng.rng()))
            }
            Index::WeightedIndex { weights } => {
                let index: WeightedIndex<f64> = WeightedIndex::new(weights)?;
                Ok(index.sample(uniform_rng.rng()))
            }
        }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        match self {
            Index::Uniform { min, max } if min < max => Ok(()),
            Index::Uniform { min, max } => Err(SimulationError::InvalidModelConfiguration(
                format!["empty index range [{}, {})", min, max],
            )),
            Index::WeightedIndex { weights } if is_probability_vector(weights) => Ok(()),
            Index::WeightedIndex { weights } => Err(SimulationError::InvalidModelConfiguration(
                format!["weights {:?} are not a probability vector", weights],
            )),
        }
    }

    /// Number of distinct values the variable can take.
    pub fn len(&self) -> usize {
        match self {
            Index::Uniform { min, max } => max.saturating_sub(*min),
            Index::WeightedIndex { weights } => weights.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
