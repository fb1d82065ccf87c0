pub mod frozen_lake;

pub use frozen_lake::{generate_random_map, FLAction, FrozenLake};
