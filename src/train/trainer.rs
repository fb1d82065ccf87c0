use std::thread;

use log::{debug, info, trace};
use rand::Rng;

use crate::{
    algo::QTableAgent,
    env::{Environment, State},
    error::{EnvError, Result},
    memory::Exp,
    render::{Frame, Render, Visualizer},
};

use super::config::{check_shape, Config};

/// What happened during one training episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub epsilon: f64,
    pub steps: usize,
    pub total_reward: f64,
}

/// Outcome of a full training run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainReport {
    pub episodes: u32,
    /// Episodes that collected a nonzero reward
    pub successes: u32,
    pub summaries: Vec<EpisodeSummary>,
}

/// Train `agent` in `env` for `config.n_training_episodes` episodes
///
/// Each episode resets the environment, then repeatedly picks an epsilon-greedy action,
/// steps the environment, and applies the Q-learning update, until the episode ends or
/// `config.max_steps` steps were taken. Every step is shown on `view`.
///
/// The agent keeps its table but learns with the learning rate, discount factor and
/// exploration schedule of `config`, which replace the ones it was built with.
/// Exploration draws come from `rng`, the environment's own dynamics don't touch it.
///
/// **Errors** on an invalid configuration, before anything runs, and on the first
/// environment failure, which aborts the run. The agent keeps whatever it learned before.
pub fn train<E, R, V>(
    agent: &mut QTableAgent,
    env: &mut E,
    config: &Config,
    rng: &mut R,
    view: &mut Visualizer<V>,
) -> Result<TrainReport>
where
    E: Environment + ?Sized,
    R: Rng + ?Sized,
    V: Render,
{
    let agent_config = config.agent_config()?;
    check_shape(agent.q_table(), env)?;
    agent.reconfigure(agent_config)?;

    let n = config.n_training_episodes;
    let state_space = env.state_space();
    let mut report = TrainReport::default();
    info!("Training for {n} episodes");

    for episode in 0..n {
        let epsilon = agent.epsilon(episode);
        let mut state = checked(env.reset(None)?, state_space)?;
        let title = format!("Training: {episode}/{n}");
        let progress = f64::from(episode) / f64::from(n);
        let mut summary = EpisodeSummary {
            episode,
            epsilon,
            steps: 0,
            total_reward: 0.0,
        };

        for _ in 0..config.max_steps {
            let action = agent.act(state, episode, rng);
            let step = env.step(action)?;
            let next_state = checked(step.next_state, state_space)?;

            let exp = Exp::from_step(state, action, &step);
            let q_value = agent.learn(&exp);
            trace!("Q({state}, {action}) <- {q_value:.4} (r = {})", step.reward);

            summary.steps += 1;
            summary.total_reward += step.reward;

            view.show(|| Frame {
                title: &title,
                q_table: agent.q_table(),
                board: env.board(),
                progress,
            });
            pace(config, view);

            if step.done || step.truncated {
                break;
            }
            state = next_state;
        }

        debug!(
            "Episode {episode}: epsilon {epsilon:.3}, {} steps, reward {}",
            summary.steps, summary.total_reward
        );
        if summary.total_reward != 0.0 {
            report.successes += 1;
        }
        report.episodes += 1;
        report.summaries.push(summary);

        if config.log_every > 0 && (episode + 1) % config.log_every == 0 {
            info!(
                "Episode {}/{n}: epsilon {epsilon:.3}, success rate {:.3}",
                episode + 1,
                recent_success_rate(&report.summaries, config.log_every as usize)
            );
        }
    }

    info!(
        "Training finished: {}/{} episodes collected reward",
        report.successes, report.episodes
    );
    Ok(report)
}

/// Reject states outside of `[0, state_space)`
pub(super) fn checked(state: State, state_space: usize) -> Result<State, EnvError> {
    if state < state_space {
        Ok(state)
    } else {
        Err(EnvError::InvalidState { state, state_space })
    }
}

/// Sleep for the configured frame delay, only while something is being rendered
pub(super) fn pace<V: Render>(config: &Config, view: &Visualizer<V>) {
    if let Some(delay) = config.frame_delay {
        if view.is_active() {
            thread::sleep(delay);
        }
    }
}

fn recent_success_rate(summaries: &[EpisodeSummary], window: usize) -> f64 {
    let recent = &summaries[summaries.len().saturating_sub(window)..];
    if recent.is_empty() {
        return 0.0;
    }
    let successes = recent.iter().filter(|s| s.total_reward != 0.0).count();
    successes as f64 / recent.len() as f64
}

#[cfg(test)]
mod tests {
    use rand::{
        rngs::{mock::StepRng, StdRng},
        SeedableRng,
    };

    use crate::{
        algo::QTableAgentConfig,
        env::{tests::MockEnv, Info, Step},
        error::{ConfigError, Error},
        render::tests::Recorder,
    };

    use super::*;

    /// Moves from state 0 to state 4 on action 1 with reward 1, then ends
    struct OneStep {
        stepped: bool,
    }

    impl Environment for OneStep {
        fn state_space(&self) -> usize {
            16
        }

        fn action_space(&self) -> usize {
            4
        }

        fn reset(&mut self, _seed: Option<u64>) -> Result<State, EnvError> {
            Ok(0)
        }

        fn step(&mut self, action: usize) -> Result<Step, EnvError> {
            self.stepped = true;
            Ok(Step {
                next_state: if action == 1 { 4 } else { 0 },
                reward: 1.0,
                done: true,
                truncated: false,
                info: Info { prob: 1.0 },
            })
        }
    }

    /// Returns a next state outside of its state space
    struct Broken;

    impl Environment for Broken {
        fn state_space(&self) -> usize {
            2
        }

        fn action_space(&self) -> usize {
            2
        }

        fn reset(&mut self, _seed: Option<u64>) -> Result<State, EnvError> {
            Ok(0)
        }

        fn step(&mut self, _action: usize) -> Result<Step, EnvError> {
            Ok(Step {
                next_state: 9,
                reward: 0.0,
                done: false,
                truncated: false,
                info: Info::default(),
            })
        }
    }

    fn agent_for<E: Environment>(env: &E, config: &Config) -> QTableAgent {
        config.build_agent(env).unwrap()
    }

    #[test]
    fn zero_episodes_leave_table_untouched() {
        let mut env = MockEnv::new(16);
        let config = Config {
            n_training_episodes: 0,
            ..Default::default()
        };
        let mut agent = agent_for(&env, &config);
        let mut rng = StdRng::seed_from_u64(0);
        let report = train(
            &mut agent,
            &mut env,
            &config,
            &mut rng,
            &mut Visualizer::headless(),
        )
        .unwrap();

        assert_eq!(report.episodes, 0);
        assert!(env.seeds.is_empty(), "environment never reset");
        assert!(agent.q_table().iter_rows().flatten().all(|&q| q == 0.0));
    }

    #[test]
    fn single_step_update() {
        let mut env = OneStep { stepped: false };
        let config = Config {
            n_training_episodes: 1,
            max_steps: 1,
            learning_rate: 0.5,
            gamma: 0.9,
            max_epsilon: 1.0,
            min_epsilon: 1.0,
            ..Default::default()
        };
        let mut agent = agent_for(&env, &config);
        // Every draw is 2^62: the exploration draw reads as 0.25 and the action draw as 1
        let mut rng = StepRng::new(1 << 62, 0);
        let report = train(
            &mut agent,
            &mut env,
            &config,
            &mut rng,
            &mut Visualizer::headless(),
        )
        .unwrap();

        assert!(env.stepped);
        assert_eq!(report.summaries[0].steps, 1);
        assert_eq!(agent.q_table().get(0, 1), 0.5, "0 + 0.5 * (1 + 0.9 * 0 - 0)");
        let nonzero = agent
            .q_table()
            .iter_rows()
            .flatten()
            .filter(|&&q| q != 0.0)
            .count();
        assert_eq!(nonzero, 1, "only the visited entry changed");
    }

    #[test]
    fn config_overrides_agent_hyperparameters() {
        let mut env = OneStep { stepped: false };
        // Built with alpha 0.1, gamma 0.99 and a decaying epsilon
        let mut agent = QTableAgent::new(16, 4, QTableAgentConfig::default()).unwrap();
        let config = Config {
            n_training_episodes: 1,
            max_steps: 1,
            learning_rate: 0.5,
            gamma: 0.9,
            max_epsilon: 1.0,
            min_epsilon: 1.0,
            ..Default::default()
        };
        let mut rng = StepRng::new(1 << 62, 0);
        train(
            &mut agent,
            &mut env,
            &config,
            &mut rng,
            &mut Visualizer::headless(),
        )
        .unwrap();

        assert_eq!(agent.q_table().get(0, 1), 0.5, "learned with the configured alpha");
        assert_eq!((agent.alpha(), agent.gamma()), (0.5, 0.9));
        assert_eq!(agent.epsilon(1000), 1.0, "configured schedule");
    }

    #[test]
    fn learns_the_corridor() {
        let mut env = MockEnv::new(6);
        let config = Config {
            n_training_episodes: 300,
            max_steps: 50,
            learning_rate: 0.5,
            gamma: 0.9,
            decay_rate: 0.02,
            ..Default::default()
        };
        let mut agent = agent_for(&env, &config);
        let mut rng = StdRng::seed_from_u64(3);
        let report = train(
            &mut agent,
            &mut env,
            &config,
            &mut rng,
            &mut Visualizer::headless(),
        )
        .unwrap();

        assert_eq!(report.episodes, 300);
        assert_eq!(env.seeds.len(), 300, "one unseeded reset per episode");
        assert!(env.seeds.iter().all(Option::is_none));
        for state in 0..5 {
            assert_eq!(agent.exploit(state), 1, "moves right in state {state}");
        }
        let last = report.summaries.last().unwrap();
        assert!(last.epsilon < report.summaries[0].epsilon, "epsilon decayed");
    }

    #[test]
    fn epsilon_per_episode_follows_schedule() {
        let mut env = MockEnv::new(4);
        let config = Config {
            n_training_episodes: 50,
            max_steps: 5,
            decay_rate: 0.1,
            ..Default::default()
        };
        let mut agent = agent_for(&env, &config);
        let mut rng = StdRng::seed_from_u64(1);
        let report = train(
            &mut agent,
            &mut env,
            &config,
            &mut rng,
            &mut Visualizer::headless(),
        )
        .unwrap();

        for pair in report.summaries.windows(2) {
            assert!(pair[1].epsilon <= pair[0].epsilon, "non-increasing");
        }
        for s in &report.summaries {
            let expected = 0.05 + 0.95 * (-0.1 * s.episode as f64).exp();
            assert!((s.epsilon - expected).abs() < 1e-12);
            assert!(s.steps <= 5, "step budget respected");
        }
    }

    #[test]
    fn invalid_config_never_runs() {
        let mut env = MockEnv::new(4);
        let mut agent = agent_for(&env, &Config::default());
        let config = Config {
            max_epsilon: 0.0,
            min_epsilon: 0.5,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let result = train(
            &mut agent,
            &mut env,
            &config,
            &mut rng,
            &mut Visualizer::headless(),
        );

        assert_eq!(
            result,
            Err(Error::Config(ConfigError::InvertedEpsilon { max: 0.0, min: 0.5 }))
        );
        assert!(env.seeds.is_empty(), "loop never started");
    }

    #[test]
    fn mismatched_agent_is_rejected() {
        let mut env = MockEnv::new(4);
        let mut agent = QTableAgent::new(16, 4, QTableAgentConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let result = train(
            &mut agent,
            &mut env,
            &Config::default(),
            &mut rng,
            &mut Visualizer::headless(),
        );
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ShapeMismatch { .. }))
        ));
    }

    #[test]
    fn environment_errors_abort() {
        let mut env = Broken;
        let config = Config::default();
        let mut agent = agent_for(&env, &config);
        let mut rng = StdRng::seed_from_u64(0);
        let result = train(
            &mut agent,
            &mut env,
            &config,
            &mut rng,
            &mut Visualizer::headless(),
        );
        assert_eq!(
            result,
            Err(Error::Environment(EnvError::InvalidState {
                state: 9,
                state_space: 2
            }))
        );
        assert!(
            agent.q_table().iter_rows().flatten().all(|&q| q == 0.0),
            "no update from a malformed transition"
        );
    }

    #[test]
    fn render_failures_do_not_stop_training() {
        let mut env = MockEnv::new(3);
        let config = Config {
            n_training_episodes: 20,
            max_steps: 10,
            ..Default::default()
        };
        let mut agent = agent_for(&env, &config);
        let mut recorder = Recorder {
            fail_after: Some(3),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut view = Visualizer::new(&mut recorder);
        let report = train(&mut agent, &mut env, &config, &mut rng, &mut view).unwrap();
        drop(view);

        assert_eq!(report.episodes, 20, "every episode ran");
        assert_eq!(recorder.titles.len(), 3);
        assert_eq!(recorder.titles[0], "Training: 0/20");
        assert!(recorder.closed);
    }

    #[test]
    fn fixed_exploration_is_reproducible() {
        let run = || {
            let mut env = MockEnv::new(5);
            let config = Config {
                n_training_episodes: 30,
                max_steps: 20,
                max_epsilon: 0.5,
                min_epsilon: 0.5,
                decay_rate: 0.0,
                ..Default::default()
            };
            let mut agent = agent_for(&env, &config);
            let mut rng = StdRng::seed_from_u64(9);
            train(
                &mut agent,
                &mut env,
                &config,
                &mut rng,
                &mut Visualizer::headless(),
            )
            .unwrap();
            agent.into_q_table()
        };
        assert_eq!(run(), run());
    }
}
