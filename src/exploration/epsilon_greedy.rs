use rand::Rng;

use crate::decay::{self, Decay};
use crate::error::ConfigError;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Epsilon threshold for the given episode
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(episode as f64)
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// Explores when a uniform draw from `[0,1)` falls below epsilon.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        decide(self.epsilon(episode), rng)
    }
}

impl EpsilonGreedy<decay::Exponential> {
    /// The usual schedule `min + (max - min) * e^(-rate * episode)`
    pub fn exponential(max: f64, min: f64, rate: f64) -> Result<Self, ConfigError> {
        decay::Exponential::new(rate, max, min).map(Self::new)
    }
}

pub(crate) fn decide<R: Rng + ?Sized>(epsilon: f64, rng: &mut R) -> Choice {
    if rng.gen::<f64>() < epsilon {
        Choice::Explore
    } else {
        Choice::Exploit
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn extreme_epsilons() {
        let mut rng = StdRng::seed_from_u64(7);
        let never = EpsilonGreedy::new(decay::Constant::new(0.0));
        let always = EpsilonGreedy::new(decay::Constant::new(1.0));
        for episode in 0..1000 {
            assert_eq!(never.choose(episode, &mut rng), Choice::Exploit);
            assert_eq!(always.choose(episode, &mut rng), Choice::Explore);
        }
    }

    #[test]
    fn exponential_schedule() {
        let policy = EpsilonGreedy::exponential(1.0, 0.05, 5e-4).unwrap();
        assert_eq!(policy.epsilon(0), 1.0, "starts at max");
        assert!(policy.epsilon(2000) < policy.epsilon(1000));
        assert!(
            EpsilonGreedy::exponential(0.05, 1.0, 5e-4).is_err(),
            "inverted bounds rejected"
        );
    }
}
