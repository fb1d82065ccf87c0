use std::io;

use frozen_q::{
    gym::FrozenLake,
    render::{TextRenderer, Visualizer},
    train::{self, Config},
};
use rand::{rngs::StdRng, SeedableRng};

const SEED: u64 = 7;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut env = FrozenLake::new("4x4", true)?.with_seed(SEED);
    let config = Config {
        n_training_episodes: 10000,
        decay_rate: 1e-3,
        min_epsilon: 0.01,
        ..Default::default()
    };
    let mut agent = config.build_agent(&env)?;
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut view = Visualizer::headless();

    train::train(&mut agent, &mut env, &config, &mut rng, &mut view)?;
    let report = train::evaluate(agent.q_table(), &mut env, &config, &mut view)?;
    println!("{report}");

    // One more greedy episode, printed frame by frame
    let replay = Config {
        n_eval_episodes: 1,
        eval_seeds: Some(vec![SEED]),
        ..config
    };
    let mut text_view = Visualizer::new(TextRenderer::new(io::stdout().lock()));
    train::evaluate(agent.q_table(), &mut env, &replay, &mut text_view)?;
    text_view.shutdown();

    println!("{}", env.render_text());
    println!(
        "steps: {} | reward: {}",
        env.report["steps"], env.report["reward"]
    );
    Ok(())
}
