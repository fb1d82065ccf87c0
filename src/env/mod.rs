mod report;

pub use report::Report;

use crate::{error::EnvError, render::Board};

/// Index of a state in `[0, S)`
pub type State = usize;

/// Index of an action in `[0, A)`
pub type Action = usize;

/// Auxiliary information returned alongside a transition
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Info {
    /// Probability of the sampled outcome under the environment's transition model
    pub prob: f64,
}

/// The outcome of taking an action in an [`Environment`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub next_state: State,
    pub reward: f64,
    /// The episode reached a terminal state
    pub done: bool,
    /// The episode was cut off by a time limit
    pub truncated: bool,
    pub info: Info,
}

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This trait represents a discrete-time MDP with one agent and finite state and
/// action spaces, both identified by indices. Anything beyond `reset`, `step`, and the
/// space sizes is an optional capability with a default implementation.
pub trait Environment {
    /// Number of states `S`
    fn state_space(&self) -> usize;

    /// Number of actions `A`
    fn action_space(&self) -> usize;

    /// Reset the environment to an initial state, reseeding its dynamics if `seed` is given
    ///
    /// **Returns** the initial state
    fn reset(&mut self, seed: Option<u64>) -> Result<State, EnvError>;

    /// Update the environment in response to an action taken by an agent
    fn step(&mut self, action: Action) -> Result<Step, EnvError>;

    /// The state `action` would lead to from the current state if the dynamics were
    /// deterministic
    ///
    /// Diagnostic hook for slip detection, `None` if the environment can't tell.
    fn expected_next_state(&self, _action: Action) -> Option<State> {
        None
    }

    /// A snapshot of the board for renderers, `None` if the environment has no layout
    fn board(&self) -> Option<Board> {
        None
    }
}
