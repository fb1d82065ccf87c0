//! Training and evaluation loops
//!
//! Both loops run single-threaded and synchronously: every step is shown on a
//! [`Visualizer`](crate::render::Visualizer) before the next one is taken.

pub mod config;
pub mod evaluate;
pub mod trainer;

pub use config::{Config, FRAME_DELAY};
pub use evaluate::{evaluate, EvalReport};
pub use trainer::{train, EpisodeSummary, TrainReport};
