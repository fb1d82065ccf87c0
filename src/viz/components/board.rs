use ratatui::{prelude::*, widgets::*};

use crate::{
    algo::QTable,
    render::{action_symbol, Board, Tile},
};

use super::action_color;

/// The lake next to the greedy policy of a Q-table
pub struct BoardView<'a> {
    board: &'a Board,
    q_table: &'a QTable,
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board, q_table: &'a QTable) -> Self {
        Self { board, q_table }
    }

    /// Columns needed to show `board` in full
    pub fn width(board: &Board) -> u16 {
        // two cells per tile, a gap, two per arrow, borders and padding
        (board.ncol * 4 + 3 + 4) as u16
    }

    fn tile_span(&self, state: usize, tile: Tile) -> Span<'static> {
        let text = format!("{} ", self.board.symbol_at(state));
        if self.board.agent == Some(state) {
            return Span::styled(text, Style::new().light_red().bold());
        }
        let style = match tile {
            Tile::Start => Style::new().light_green(),
            Tile::Frozen => Style::new().light_cyan(),
            Tile::Hole => Style::new().dark_gray(),
            Tile::Goal => Style::new().yellow().bold(),
        };
        Span::styled(text, style)
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let policy = self.q_table.greedy_actions();
        let lines = self
            .board
            .rows()
            .enumerate()
            .map(|(r, row)| {
                let offset = r * self.board.ncol;
                let tiles = row
                    .iter()
                    .enumerate()
                    .map(|(c, &tile)| self.tile_span(offset + c, tile));
                let arrows = row.iter().enumerate().map(|(c, tile)| {
                    let state = offset + c;
                    match policy.get(state) {
                        Some(&action) if !tile.is_terminal() => Span::styled(
                            format!("{} ", action_symbol(action)),
                            Style::new().fg(action_color(action)),
                        ),
                        _ => Span::styled(format!("{} ", tile.symbol()), Style::new().dark_gray()),
                    }
                });
                Line::from(
                    tiles
                        .chain(std::iter::once(Span::raw("   ")))
                        .chain(arrows)
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .padding(Padding::horizontal(1))
                    .title("Lake"),
            )
            .render(area, buf);
    }
}
