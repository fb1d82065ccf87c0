use std::io;

use thiserror::Error;

/// Invalid run configuration, detected before any loop starts
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for `{name}`: {value} is not in the interval [{min}, {max}]")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("epsilon bounds are inverted: max {max} is less than min {min}")]
    InvertedEpsilon { max: f64, min: f64 },

    #[error("decay rate must be non-negative, got {0}")]
    NegativeDecay(f64),

    #[error("`max_steps` must be at least 1")]
    ZeroMaxSteps,

    #[error("evaluation needs {needed} seeds but only {provided} were provided")]
    MissingSeeds { needed: usize, provided: usize },

    #[error("invalid map: {0}")]
    InvalidMap(String),

    #[error("Q-table of shape {table:?} does not fit an environment of shape {env:?}")]
    ShapeMismatch {
        table: (usize, usize),
        env: (usize, usize),
    },
}

/// Violation of the environment contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvError {
    #[error("action {action} is outside the action space of size {action_space}")]
    InvalidAction { action: usize, action_space: usize },

    #[error("state {state} is outside the state space of size {state_space}")]
    InvalidState { state: usize, state_space: usize },

    #[error("environment stepped before reset")]
    NotReset,
}

/// Failure inside a renderer
///
/// Never propagated into the learning path, see [`Visualizer`](crate::render::Visualizer)
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("view closed by user")]
    Closed,
}

/// Errors returned by the training and evaluation loops
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("environment error: {0}")]
    Environment(#[from] EnvError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = Error::from(ConfigError::InvertedEpsilon { max: 0.1, min: 0.5 });
        assert_eq!(
            err.to_string(),
            "configuration error: epsilon bounds are inverted: max 0.1 is less than min 0.5",
            "config error is wrapped with context"
        );

        let err = Error::from(EnvError::InvalidAction {
            action: 7,
            action_space: 4,
        });
        assert_eq!(
            err.to_string(),
            "environment error: action 7 is outside the action space of size 4",
            "env error is wrapped with context"
        );
    }
}
