/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

mod epsilon_greedy;

pub(crate) use epsilon_greedy::decide;
pub use epsilon_greedy::EpsilonGreedy;
