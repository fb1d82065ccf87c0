use frozen_q::{
    gym::FrozenLake,
    render::Visualizer,
    train::{self, Config, FRAME_DELAY},
    viz::{self, LakeView},
};
use log::LevelFilter;
use rand::{rngs::StdRng, SeedableRng};

const SEED: u64 = 42;
const NUM_EPISODES: u32 = 10000;

fn main() -> anyhow::Result<()> {
    viz::init_logger(LevelFilter::Info)?;

    let mut env = FrozenLake::new("4x4", true)?.with_seed(SEED);
    let config = Config {
        n_training_episodes: NUM_EPISODES,
        decay_rate: 1e-3,
        min_epsilon: 0.01,
        eval_seeds: Some((0..100).collect()),
        ..Default::default()
    };
    let mut agent = config.build_agent(&env)?;
    let mut rng = StdRng::seed_from_u64(SEED);

    let mut view = Visualizer::new(LakeView::new()?);
    train::train(&mut agent, &mut env, &config, &mut rng, &mut view)?;

    // Slow down for evaluation so the episodes can be followed
    let eval_config = Config {
        frame_delay: Some(FRAME_DELAY),
        ..config
    };
    let report = train::evaluate(agent.q_table(), &mut env, &eval_config, &mut view)?;
    view.shutdown();

    println!("{report}");
    Ok(())
}
