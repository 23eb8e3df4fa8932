use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

/// The uniform random number generator underlying every random variate of a
/// simulation run.  A run owns exactly one generator, seeded once at
/// construction, so a fixed seed reproduces the full event sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformRNG {
    rng: Pcg64Mcg,
}

impl Default for UniformRNG {
    fn default() -> Self {
        Self {
            rng: Pcg64Mcg::new(42),
        }
    }
}

impl UniformRNG {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn rng(&mut self) -> &mut Pcg64Mcg {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn equal_seeds_give_equal_streams() {
        let mut first = UniformRNG::from_seed(110);
        let mut second = UniformRNG::from_seed(110);
        let first_draws: Vec<f64> = (0..100).map(|_| first.rng().gen()).collect();
        let second_draws: Vec<f64> = (0..100).map(|_| second.rng().gen()).collect();
        assert_eq!(first_draws, second_draws);
    }

    #[test]
    fn different_seeds_give_different_streams() {
        let mut first = UniformRNG::from_seed(1);
        let mut second = UniformRNG::from_seed(2);
        let first_draw: u64 = first.rng().gen();
        let second_draw: u64 = second.rng().gen();
        assert_ne!(first_draw, second_draw);
    }
}
