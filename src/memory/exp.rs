use crate::env::{Action, State, Step};

/// Represents a single experience or transition in the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exp {
    /// The state of the environment before taking the action
    pub state: State,
    /// The action taken in the given state
    pub action: Action,
    /// The reward received after taking the action
    pub reward: f64,
    /// The state of the environment after the action is taken
    pub next_state: State,
    /// Whether `next_state` is terminal
    ///
    /// Kept for callers that inspect transitions. The Q-learning update ignores it and
    /// still bootstraps from `next_state`, whose row is never updated and stays zero.
    pub done: bool,
}

impl Exp {
    /// Build the experience for `action` taken in `state` with the given outcome
    pub fn from_step(state: State, action: Action, step: &Step) -> Self {
        Self {
            state,
            action,
            reward: step.reward,
            next_state: step.next_state,
            done: step.done,
        }
    }
}
