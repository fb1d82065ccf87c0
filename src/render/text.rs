use std::io::Write;

use crate::{algo::QTable, error::RenderError};

use super::{action_symbol, Board, Frame, Render};

/// Writes each frame as plain text: the title, then one line per board row holding
/// the tiles, the greedy policy, and the row's action values
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Lay out a frame as lines of text
pub fn frame_lines(frame: &Frame<'_>) -> Vec<String> {
    let mut lines = vec![frame.title.to_owned()];
    match &frame.board {
        Some(board) => lines.extend(board_lines(board, frame.q_table)),
        None => lines.extend(
            frame
                .q_table
                .iter_rows()
                .enumerate()
                .map(|(s, row)| {
                    let arrow = action_symbol(frame.q_table.row_max(s).0);
                    format!("{s:>3} {arrow} {}", values(row))
                }),
        ),
    }
    lines
}

fn board_lines(board: &Board, table: &QTable) -> Vec<String> {
    let policy = table.greedy_actions();
    let (states, _) = table.shape();
    board
        .lines()
        .into_iter()
        .enumerate()
        .map(|(r, tiles)| {
            let cells = (r * board.ncol..(r + 1) * board.ncol).filter(|&s| s < states);
            let arrows: String = cells.clone().map(|s| action_symbol(policy[s])).collect();
            let q_values = cells
                .map(|s| values(table.row(s)))
                .collect::<Vec<_>>()
                .join("  ");
            format!("{tiles}  {arrows}  {q_values}")
        })
        .collect()
}

fn values(row: &[f64]) -> String {
    row.iter()
        .map(|q| format!("{q:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W: Write> Render for TextRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        for line in frame_lines(frame) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::render::{Tile, Visualizer};

    use super::*;

    #[test]
    fn text_frame_layout() {
        let mut table = QTable::new(4, 4);
        table.set(0, 1, 0.5);
        table.set(3, 3, -0.25);
        let board = Board {
            tiles: vec![Tile::Start, Tile::Frozen, Tile::Hole, Tile::Goal],
            ncol: 2,
            agent: Some(1),
        };
        let frame = Frame {
            title: "Training: 1/10",
            q_table: &table,
            board: Some(board),
            progress: 0.1,
        };

        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render(&frame).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            text,
            "Training: 1/10\n\
             SP  ↓←  0.00 0.50 0.00 0.00  0.00 0.00 0.00 0.00\n\
             HG  ←←  0.00 0.00 0.00 0.00  0.00 0.00 0.00 -0.25\n"
        );
    }

    #[test]
    fn text_frame_without_board() {
        let table = QTable::new(2, 2);
        let frame = Frame {
            title: "t",
            q_table: &table,
            board: None,
            progress: 0.0,
        };
        assert_eq!(frame_lines(&frame), ["t", "  0 ← 0.00 0.00", "  1 ← 0.00 0.00"]);
    }

    #[test]
    fn visualizer_writes_text_frames() {
        let table = QTable::new(1, 2);
        let mut out = Vec::new();
        {
            let mut view = Visualizer::new(TextRenderer::new(&mut out));
            for title in ["Evaluating: 1/2", "Evaluating: 2/2"] {
                view.show(|| Frame {
                    title,
                    q_table: &table,
                    board: None,
                    progress: 0.5,
                });
            }
            assert!(view.is_active());
        }

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Evaluating: 1/2\n  0 ← 0.00 0.00\nEvaluating: 2/2\n  0 ← 0.00 0.00\n"
        );
    }
}
