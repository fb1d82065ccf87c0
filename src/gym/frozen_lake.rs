use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::{EnumIter, FromRepr, VariantArray};

use crate::{
    check_interval,
    env::{Action, Environment, Info, Report, State, Step},
    error::{ConfigError, EnvError},
    render::{Board, Tile},
};

#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(usize)]
pub enum FLAction {
    Left = 0,
    Down = 1,
    Right = 2,
    Up = 3,
}

impl FLAction {
    /// The action `quarter_turns` counter-clockwise of this one
    fn rotate(self, quarter_turns: usize) -> Self {
        Self::VARIANTS[(self as usize + quarter_turns) % Self::VARIANTS.len()]
    }
}

/// The gymnasium 4x4 lake
pub const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

/// The gymnasium 8x8 lake
pub const MAP_8X8: [&str; 8] = [
    "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF",
    "FFFHFFFG",
];

/// One possible result of an action
#[derive(Debug, Clone, Copy, PartialEq)]
struct Outcome {
    prob: f64,
    next_state: State,
    reward: f64,
    done: bool,
}

/// A very simple RL environment taken from Python [gymnasium](https://gymnasium.farama.org/)
///
/// The agent walks from `S` to `G` across frozen tiles `F` without falling into a hole `H`.
/// Reaching the goal pays 1, everything else pays 0, and both holes and the goal end the
/// episode. Moving into a wall leaves the agent where it is.
///
/// On a slippery lake the intended move only happens a third of the time; otherwise the
/// agent slides to one of the two perpendicular directions. The dynamics draw from the
/// lake's own RNG, which is reseeded by [`reset`](Environment::reset) when a seed is given.
///
/// Intended for use with a [`QTableAgent`](crate::algo::QTableAgent)
#[derive(Debug, Clone)]
pub struct FrozenLake {
    tiles: Vec<Tile>,
    ncol: usize,
    is_slippery: bool,
    transitions: Vec<[Vec<Outcome>; 4]>,
    starts: Vec<State>,
    pos: Option<State>,
    last_action: Option<FLAction>,
    elapsed: usize,
    time_limit: Option<usize>,
    rng: StdRng,
    pub report: Report,
}

impl FrozenLake {
    /// One of the named gymnasium maps, `"4x4"` or `"8x8"`
    pub fn new(map_name: &str, is_slippery: bool) -> Result<Self, ConfigError> {
        match map_name {
            "4x4" => Self::from_desc(&MAP_4X4, is_slippery),
            "8x8" => Self::from_desc(&MAP_8X8, is_slippery),
            _ => Err(ConfigError::InvalidMap(format!("unknown map name `{map_name}`"))),
        }
    }

    /// A lake from rows of `S`, `F`, `H`, and `G`
    ///
    /// **Errors** if the rows are empty or ragged, contain other characters, or have no start
    pub fn from_desc<T: AsRef<str>>(desc: &[T], is_slippery: bool) -> Result<Self, ConfigError> {
        let ncol = desc.first().map_or(0, |row| row.as_ref().chars().count());
        if ncol == 0 {
            return Err(ConfigError::InvalidMap("map is empty".into()));
        }

        let mut tiles = Vec::with_capacity(desc.len() * ncol);
        for (r, row) in desc.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != ncol {
                return Err(ConfigError::InvalidMap(format!(
                    "row {r} has {} tiles, expected {ncol}",
                    row.chars().count()
                )));
            }
            for c in row.chars() {
                let tile = Tile::from_symbol(c).ok_or_else(|| {
                    ConfigError::InvalidMap(format!("unknown tile `{c}` in row {r}"))
                })?;
                tiles.push(tile);
            }
        }

        let starts: Vec<State> = (0..tiles.len())
            .filter(|&s| tiles[s] == Tile::Start)
            .collect();
        if starts.is_empty() {
            return Err(ConfigError::InvalidMap("map has no start tile".into()));
        }

        let mut lake = Self {
            tiles,
            ncol,
            is_slippery,
            transitions: Vec::new(),
            starts,
            pos: None,
            last_action: None,
            elapsed: 0,
            time_limit: None,
            rng: StdRng::from_entropy(),
            report: Report::new(vec!["steps", "reward"]),
        };
        lake.transitions = (0..lake.tiles.len())
            .map(|s| std::array::from_fn(|a| lake.outcomes(s, FLAction::VARIANTS[a])))
            .collect();
        Ok(lake)
    }

    /// Seed the lake's dynamics
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Truncate episodes after `steps` steps
    pub fn with_time_limit(mut self, steps: usize) -> Self {
        self.time_limit = Some(steps);
        self
    }

    pub fn nrow(&self) -> usize {
        self.tiles.len() / self.ncol
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn is_slippery(&self) -> bool {
        self.is_slippery
    }

    pub fn tile(&self, state: State) -> Tile {
        self.tiles[state]
    }

    /// The agent's current state, `None` before the first reset
    pub fn state(&self) -> Option<State> {
        self.pos
    }

    /// The gymnasium "ansi" frame: the last action in parentheses, then the map with the
    /// agent's tile highlighted in red
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if let Some(action) = self.last_action {
            out.push_str(&format!("  ({action:?})\n"));
        }
        for (r, row) in self.tiles.chunks(self.ncol).enumerate() {
            for (c, tile) in row.iter().enumerate() {
                if self.pos == Some(r * self.ncol + c) {
                    out.push_str(&format!("\x1b[41m{}\x1b[0m", tile.symbol()));
                } else {
                    out.push(tile.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    /// Where a deterministic move leads, walls keep the agent in place
    fn inc(&self, state: State, action: FLAction) -> State {
        let (row, col) = (state / self.ncol, state % self.ncol);
        let (row, col) = match action {
            FLAction::Left => (row, col.saturating_sub(1)),
            FLAction::Down => ((row + 1).min(self.nrow() - 1), col),
            FLAction::Right => (row, (col + 1).min(self.ncol - 1)),
            FLAction::Up => (row.saturating_sub(1), col),
        };
        row * self.ncol + col
    }

    fn intended(&self, state: State, action: FLAction) -> State {
        if self.tiles[state].is_terminal() {
            state
        } else {
            self.inc(state, action)
        }
    }

    fn outcomes(&self, state: State, action: FLAction) -> Vec<Outcome> {
        if self.tiles[state].is_terminal() {
            return vec![Outcome {
                prob: 1.0,
                next_state: state,
                reward: 0.0,
                done: true,
            }];
        }

        let moves = if self.is_slippery {
            vec![action.rotate(3), action, action.rotate(1)]
        } else {
            vec![action]
        };
        let prob = 1.0 / moves.len() as f64;
        moves
            .into_iter()
            .map(|a| {
                let next_state = self.inc(state, a);
                let tile = self.tiles[next_state];
                Outcome {
                    prob,
                    next_state,
                    reward: if tile == Tile::Goal { 1.0 } else { 0.0 },
                    done: tile.is_terminal(),
                }
            })
            .collect()
    }
}

/// Draw from a categorical distribution given a uniform draw `x` in `[0,1)`
fn sample(outcomes: &[Outcome], x: f64) -> Outcome {
    let mut cumulative = 0.0;
    outcomes
        .iter()
        .find(|outcome| {
            cumulative += outcome.prob;
            cumulative > x
        })
        .unwrap_or(&outcomes[outcomes.len() - 1])
        .to_owned()
}

impl Environment for FrozenLake {
    fn state_space(&self) -> usize {
        self.tiles.len()
    }

    fn action_space(&self) -> usize {
        FLAction::VARIANTS.len()
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<State, EnvError> {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let start = self.starts[self.rng.gen_range(0..self.starts.len())];
        self.pos = Some(start);
        self.last_action = None;
        self.elapsed = 0;
        self.report.take();
        Ok(start)
    }

    fn step(&mut self, action: Action) -> Result<Step, EnvError> {
        let pos = self.pos.ok_or(EnvError::NotReset)?;
        let fl_action = FLAction::from_repr(action).ok_or(EnvError::InvalidAction {
            action,
            action_space: self.action_space(),
        })?;

        let x = self.rng.gen::<f64>();
        let outcome = sample(&self.transitions[pos][action], x);

        self.pos = Some(outcome.next_state);
        self.last_action = Some(fl_action);
        self.elapsed += 1;
        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report
            .entry("reward")
            .and_modify(|x| *x += outcome.reward);
        trace!(
            "{pos} --{fl_action:?}--> {} (p = {:.3})",
            outcome.next_state,
            outcome.prob
        );

        Ok(Step {
            next_state: outcome.next_state,
            reward: outcome.reward,
            done: outcome.done,
            truncated: self.time_limit.is_some_and(|limit| self.elapsed >= limit),
            info: Info { prob: outcome.prob },
        })
    }

    fn expected_next_state(&self, action: Action) -> Option<State> {
        let pos = self.pos?;
        FLAction::from_repr(action).map(|a| self.intended(pos, a))
    }

    fn board(&self) -> Option<Board> {
        Some(Board {
            tiles: self.tiles.clone(),
            ncol: self.ncol,
            agent: self.pos,
        })
    }
}

/// Generate a random `size` × `size` map with a frozen path from start to goal
///
/// Each tile other than the start and the goal is frozen with probability `p_frozen`.
/// Maps are redrawn until the goal is reachable.
pub fn generate_random_map<R: Rng + ?Sized>(
    size: usize,
    p_frozen: f64,
    rng: &mut R,
) -> Result<Vec<String>, ConfigError> {
    if size < 2 {
        return Err(ConfigError::InvalidMap(format!(
            "random maps need a size of at least 2, got {size}"
        )));
    }
    check_interval!(p_frozen, f64::MIN_POSITIVE, 1.0);

    loop {
        let mut tiles: Vec<Tile> = (0..size * size)
            .map(|_| {
                if rng.gen_bool(p_frozen) {
                    Tile::Frozen
                } else {
                    Tile::Hole
                }
            })
            .collect();
        tiles[0] = Tile::Start;
        tiles[size * size - 1] = Tile::Goal;

        if is_solvable(&tiles, size) {
            return Ok(tiles
                .chunks(size)
                .map(|row| row.iter().map(|t| t.symbol()).collect())
                .collect());
        }
    }
}

/// Depth-first search from the top-left corner to any goal, avoiding holes
fn is_solvable(tiles: &[Tile], ncol: usize) -> bool {
    let nrow = tiles.len() / ncol;
    let mut discovered = vec![false; tiles.len()];
    let mut frontier = vec![0];
    discovered[0] = true;

    while let Some(s) = frontier.pop() {
        let (r, c) = (s / ncol, s % ncol);
        let neighbors = [
            (r > 0).then(|| s - ncol),
            (r + 1 < nrow).then(|| s + ncol),
            (c > 0).then(|| s - 1),
            (c + 1 < ncol).then(|| s + 1),
        ];
        for n in neighbors.into_iter().flatten() {
            if discovered[n] {
                continue;
            }
            match tiles[n] {
                Tile::Goal => return true,
                Tile::Hole => {}
                Tile::Start | Tile::Frozen => {
                    discovered[n] = true;
                    frontier.push(n);
                }
            }
        }
    }

    false
}
