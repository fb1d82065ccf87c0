/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Experience tuples
pub mod memory;

/// Rendering of the learning loops
pub mod render;

/// Training and evaluation loops
pub mod train;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

/// Terminal user interface
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{Error, Result};
