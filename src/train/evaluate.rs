use std::fmt;

use log::{debug, info};

use crate::{
    algo::{tabular::policy, QTable},
    env::Environment,
    error::Result,
    render::{Frame, Render, Visualizer},
};

use super::{
    config::{check_shape, Config},
    trainer::{checked, pace},
};

/// Outcome of an evaluation run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvalReport {
    pub episodes: u32,
    /// Indices of the episodes that collected a nonzero reward, ascending
    pub successful_episodes: Vec<u32>,
    /// Steps per episode whose outcome differed from the intended move
    pub slips_per_episode: Vec<usize>,
    /// Mean of `slips_per_episode`, 0 when nothing was evaluated
    pub mean_slips: f64,
}

impl EvalReport {
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successful_episodes.len() as f64 / f64::from(self.episodes)
        }
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successful episodes: {}/{} | Avg slips: {:.2}",
            self.successful_episodes.len(),
            self.episodes,
            self.mean_slips
        )
    }
}

/// Run the greedy policy of `q_table` in `env` for `config.n_eval_episodes` episodes
/// without learning
///
/// Episode `i` resets the environment with `config.eval_seeds[i]` when seeds are given.
/// A slip is a step whose next state differs from [`Environment::expected_next_state`];
/// environments without that hook never slip.
///
/// **Errors** on an invalid configuration, before anything runs, and on the first
/// environment failure.
pub fn evaluate<E, V>(
    q_table: &QTable,
    env: &mut E,
    config: &Config,
    view: &mut Visualizer<V>,
) -> Result<EvalReport>
where
    E: Environment + ?Sized,
    V: Render,
{
    config.validate()?;
    check_shape(q_table, env)?;

    let n = config.n_eval_episodes;
    let state_space = env.state_space();
    let seeds = config.seeds();
    let mut report = EvalReport::default();
    info!("Evaluating for {n} episodes");

    for episode in 0..n {
        let seed = seeds.map(|seeds| seeds[episode as usize]);
        let mut state = checked(env.reset(seed)?, state_space)?;
        let progress = f64::from(episode) / f64::from(n);
        let mut slips = 0;
        let mut success = false;

        for _ in 0..config.max_steps {
            let action = policy::greedy(q_table, state);
            let expected = env.expected_next_state(action);
            let step = env.step(action)?;
            let next_state = checked(step.next_state, state_space)?;

            if expected.is_some_and(|expected| expected != next_state) {
                slips += 1;
            }
            if step.reward != 0.0 {
                success = true;
            }

            if view.is_active() {
                let title = format!("Evaluating: {episode}/{n} | Slips: {slips}");
                view.show(|| Frame {
                    title: &title,
                    q_table,
                    board: env.board(),
                    progress,
                });
                pace(config, view);
            }

            if step.done || step.truncated {
                break;
            }
            state = next_state;
        }

        debug!("Evaluation episode {episode}: success {success}, {slips} slips");
        if success {
            report.successful_episodes.push(episode);
        }
        report.slips_per_episode.push(slips);
        report.episodes += 1;
    }

    if !report.slips_per_episode.is_empty() {
        report.mean_slips = report.slips_per_episode.iter().sum::<usize>() as f64
            / report.slips_per_episode.len() as f64;
    }
    info!("{report}");
    Ok(report)
}
