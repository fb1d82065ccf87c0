use rand::Rng;

use crate::{
    env::{Action, State},
    exploration::{self, Choice},
};

use super::q_table::QTable;

/// The action with the highest value in `state`, lowest index among ties
pub fn greedy(table: &QTable, state: State) -> Action {
    table.row_max(state).0
}

/// With probability `epsilon` a uniformly random action, otherwise the [`greedy`] one
///
/// The action space is the width of `table`.
pub fn epsilon_greedy<R: Rng + ?Sized>(
    table: &QTable,
    state: State,
    epsilon: f64,
    rng: &mut R,
) -> Action {
    match exploration::decide(epsilon, rng) {
        Choice::Explore => rng.gen_range(0..table.shape().1),
        Choice::Exploit => greedy(table, state),
    }
}
