//! Run configuration
//!
//! All hyperparameters of a training and evaluation run live in one plain struct.
//! Validation happens before either loop takes its first step.

use std::time::Duration;

use crate::{
    algo::{QTable, QTableAgent, QTableAgentConfig},
    check_interval, decay,
    env::Environment,
    error::ConfigError,
    exploration::EpsilonGreedy,
};

/// Pause between rendered steps used by the demos when pacing is enabled
pub const FRAME_DELAY: Duration = Duration::from_millis(10);

/// Configuration of a training and evaluation run
///
/// The defaults solve the slippery 4x4 lake reasonably well.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of training episodes
    pub n_training_episodes: u32,
    /// Number of evaluation episodes
    pub n_eval_episodes: u32,
    /// Step budget of a single episode
    pub max_steps: usize,
    /// Learning rate α, in `[0,1]`
    pub learning_rate: f64,
    /// Discount factor γ, in `[0,1]`
    pub gamma: f64,
    /// Exploration probability of the first episode
    pub max_epsilon: f64,
    /// Exploration probability the schedule decays toward
    pub min_epsilon: f64,
    /// Exponential decay rate of the exploration probability per episode
    pub decay_rate: f64,
    /// Seeds to reset the environment with, one per evaluation episode
    ///
    /// `None` or an empty list resets unseeded.
    pub eval_seeds: Option<Vec<u64>>,
    /// Pause after every rendered step, ignored while headless
    pub frame_delay: Option<Duration>,
    /// Log training progress every this many episodes, 0 disables it
    pub log_every: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n_training_episodes: 2000,
            n_eval_episodes: 100,
            max_steps: 99,
            learning_rate: 0.1,
            gamma: 0.99,
            max_epsilon: 1.0,
            min_epsilon: 0.05,
            decay_rate: 5e-4,
            eval_seeds: None,
            frame_delay: None,
            log_every: 100,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let &Self {
            n_eval_episodes,
            max_steps,
            learning_rate,
            gamma,
            max_epsilon,
            min_epsilon,
            decay_rate,
            ..
        } = self;

        check_interval!(learning_rate, 0.0, 1.0);
        check_interval!(gamma, 0.0, 1.0);
        check_interval!(max_epsilon, 0.0, 1.0);
        check_interval!(min_epsilon, 0.0, 1.0);
        if max_epsilon < min_epsilon {
            return Err(ConfigError::InvertedEpsilon {
                max: max_epsilon,
                min: min_epsilon,
            });
        }
        if !(decay_rate >= 0.0) {
            return Err(ConfigError::NegativeDecay(decay_rate));
        }
        if max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if let Some(seeds) = self.seeds() {
            if seeds.len() < n_eval_episodes as usize {
                return Err(ConfigError::MissingSeeds {
                    needed: n_eval_episodes as usize,
                    provided: seeds.len(),
                });
            }
        }
        Ok(())
    }

    /// The evaluation seeds, if any were given
    pub fn seeds(&self) -> Option<&[u64]> {
        self.eval_seeds.as_deref().filter(|seeds| !seeds.is_empty())
    }

    /// The exploration schedule `min + (max - min) * e^(-decay_rate * episode)`
    pub fn exploration(&self) -> Result<EpsilonGreedy<decay::Exponential>, ConfigError> {
        EpsilonGreedy::exponential(self.max_epsilon, self.min_epsilon, self.decay_rate)
    }

    pub fn agent_config(&self) -> Result<QTableAgentConfig, ConfigError> {
        self.validate()?;
        Ok(QTableAgentConfig {
            exploration: self.exploration()?,
            alpha: self.learning_rate,
            gamma: self.gamma,
        })
    }

    /// A fresh agent sized for `env`
    pub fn build_agent<E: Environment + ?Sized>(&self, env: &E) -> Result<QTableAgent, ConfigError> {
        QTableAgent::new(env.state_space(), env.action_space(), self.agent_config()?)
    }
}

/// Check that `table` can index every state and action of `env`
pub(crate) fn check_shape<E: Environment + ?Sized>(
    table: &QTable,
    env: &E,
) -> Result<(), ConfigError> {
    let env_shape = (env.state_space(), env.action_space());
    if table.shape() != env_shape {
        return Err(ConfigError::ShapeMismatch {
            table: table.shape(),
            env: env_shape,
        });
    }
    Ok(())
}
