use crate::env::{Action, State};

/// A cell of a grid world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Start,
    Frozen,
    Hole,
    Goal,
}

impl Tile {
    pub fn symbol(self) -> char {
        match self {
            Tile::Start => 'S',
            Tile::Frozen => 'F',
            Tile::Hole => 'H',
            Tile::Goal => 'G',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'S' => Some(Tile::Start),
            'F' => Some(Tile::Frozen),
            'H' => Some(Tile::Hole),
            'G' => Some(Tile::Goal),
            _ => None,
        }
    }

    /// Whether stepping onto this tile ends the episode
    pub fn is_terminal(self) -> bool {
        matches!(self, Tile::Hole | Tile::Goal)
    }
}

/// Arrow for the four grid moves, `?` for anything else
pub fn action_symbol(action: Action) -> char {
    match action {
        0 => '←',
        1 => '↓',
        2 => '→',
        3 => '↑',
        _ => '?',
    }
}

/// A snapshot of a rectangular grid world and the agent's position in it
///
/// Tiles are stored row-major, so a state index is also a tile index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub tiles: Vec<Tile>,
    pub ncol: usize,
    pub agent: Option<State>,
}

impl Board {
    pub fn nrow(&self) -> usize {
        self.tiles.len().checked_div(self.ncol).unwrap_or(0)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.tiles.chunks(self.ncol.max(1))
    }

    /// The symbol at `state`, `P` where the agent stands
    pub fn symbol_at(&self, state: State) -> char {
        if self.agent == Some(state) {
            'P'
        } else {
            self.tiles[state].symbol()
        }
    }

    /// One string per row of [`symbol_at`](Self::symbol_at) symbols
    pub fn lines(&self) -> Vec<String> {
        (0..self.nrow())
            .map(|r| {
                (r * self.ncol..(r + 1) * self.ncol)
                    .map(|s| self.symbol_at(s))
                    .collect()
            })
            .collect()
    }
}
