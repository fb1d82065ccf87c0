use rand::Rng;

use crate::{
    check_interval, decay,
    env::{Action, State},
    error::ConfigError,
    exploration::EpsilonGreedy,
    memory::Exp,
};

use super::policy;

/// A dense table of action values with one row per state and one column per action
///
/// The shape is fixed at construction. Indexing outside of it is a programming error
/// and panics like slice indexing does.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<f64>,
    states: usize,
    actions: usize,
}

impl QTable {
    /// A `states` × `actions` table of zeros
    pub fn new(states: usize, actions: usize) -> Self {
        Self {
            values: vec![0.0; states * actions],
            states,
            actions,
        }
    }

    /// `(S, A)`
    pub fn shape(&self) -> (usize, usize) {
        (self.states, self.actions)
    }

    pub fn get(&self, state: State, action: Action) -> f64 {
        self.row(state)[action]
    }

    pub fn set(&mut self, state: State, action: Action, value: f64) {
        let ix = self.index(state, action);
        self.values[ix] = value;
    }

    /// The action values of `state`
    pub fn row(&self, state: State) -> &[f64] {
        assert!(state < self.states, "state {state} out of bounds");
        &self.values[state * self.actions..(state + 1) * self.actions]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks(self.actions.max(1)).take(self.states)
    }

    /// The best action of `state` and its value
    ///
    /// Ties go to the lowest action index.
    pub fn row_max(&self, state: State) -> (Action, f64) {
        self.row(state)
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (a, q)| {
                if q > best.1 {
                    (a, q)
                } else {
                    best
                }
            })
    }

    /// The greedy action of every state, in state order
    pub fn greedy_actions(&self) -> Vec<Action> {
        (0..self.states).map(|s| self.row_max(s).0).collect()
    }

    /// Q-learning update of a single entry
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)]
    ///
    /// The max is taken over the table as it is now. **Returns** the new value of Q(s,a).
    pub fn q_learning_update(&mut self, exp: &Exp, alpha: f64, gamma: f64) -> f64 {
        let Exp {
            state,
            action,
            reward,
            next_state,
            ..
        } = *exp;

        let q_value = self.get(state, action);
        let (_, max_next_q) = self.row_max(next_state);
        let target = reward + gamma * max_next_q;
        let new_q_value = q_value + alpha * (target - q_value);

        self.set(state, action, new_q_value);
        new_q_value
    }

    fn index(&self, state: State, action: Action) -> usize {
        assert!(state < self.states, "state {state} out of bounds");
        assert!(action < self.actions, "action {action} out of bounds");
        state * self.actions + action
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig {
    pub exploration: EpsilonGreedy<decay::Exponential>,
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(decay::Exponential::new(5e-4, 1.0, 0.05).unwrap()),
            alpha: 0.1,
            gamma: 0.99,
        }
    }
}

/// A simple Q-learning agent that owns the Q-table it learns
#[derive(Debug, Clone)]
pub struct QTableAgent {
    q_table: QTable,
    exploration: EpsilonGreedy<decay::Exponential>,
    alpha: f64,
    gamma: f64,
}

impl QTableAgent {
    /// Initialize a new `QTableAgent` for an environment with the given space sizes
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(
        state_space: usize,
        action_space: usize,
        config: QTableAgentConfig,
    ) -> Result<Self, ConfigError> {
        let QTableAgentConfig {
            exploration,
            alpha,
            gamma,
        } = config;
        check_interval!(alpha, 0.0, 1.0);
        check_interval!(gamma, 0.0, 1.0);

        Ok(Self {
            q_table: QTable::new(state_space, action_space),
            exploration,
            alpha,
            gamma,
        })
    }

    /// Replace the learning rate, discount factor and exploration schedule, keeping the
    /// table
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`, leaving the agent
    /// unchanged
    pub fn reconfigure(&mut self, config: QTableAgentConfig) -> Result<(), ConfigError> {
        let QTableAgentConfig {
            exploration,
            alpha,
            gamma,
        } = config;
        check_interval!(alpha, 0.0, 1.0);
        check_interval!(gamma, 0.0, 1.0);

        self.exploration = exploration;
        self.alpha = alpha;
        self.gamma = gamma;
        Ok(())
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Consume the agent, keeping only what it learned
    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Exploration threshold for `episode`
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.exploration.epsilon(episode)
    }

    /// Choose an action in `state` with the exploration schedule evaluated at `episode`
    pub fn act<R: Rng + ?Sized>(&self, state: State, episode: u32, rng: &mut R) -> Action {
        policy::epsilon_greedy(&self.q_table, state, self.epsilon(episode), rng)
    }

    /// Choose the best known action in `state`
    pub fn exploit(&self, state: State) -> Action {
        policy::greedy(&self.q_table, state)
    }

    /// Learn from a given experience and update the table
    pub fn learn(&mut self, exp: &Exp) -> f64 {
        self.q_table.q_learning_update(exp, self.alpha, self.gamma)
    }
}
