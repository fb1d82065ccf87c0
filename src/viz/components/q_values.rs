use ratatui::{prelude::*, widgets::*};

use crate::{algo::QTable, env::State, render::action_symbol};

use super::action_color;

/// The Q-table, one row per state and one colored column per action
///
/// The row of the agent's state is highlighted and kept in view, the best action of
/// every row is bold.
pub struct QValues<'a> {
    q_table: &'a QTable,
    agent: Option<State>,
}

impl<'a> QValues<'a> {
    pub fn new(q_table: &'a QTable, agent: Option<State>) -> Self {
        Self { q_table, agent }
    }
}

impl Widget for QValues<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (_, actions) = self.q_table.shape();

        let header = Row::new(
            std::iter::once(Cell::from("s")).chain((0..actions).map(|a| {
                Cell::from(action_symbol(a).to_string())
                    .style(Style::new().fg(action_color(a)).bold())
            })),
        );

        let rows = self.q_table.iter_rows().enumerate().map(|(s, values)| {
            let (best, _) = self.q_table.row_max(s);
            let cells = values.iter().enumerate().map(|(a, q)| {
                let style = Style::new().fg(action_color(a));
                let style = if a == best { style.bold() } else { style };
                Cell::from(format!("{q:.3}")).style(style)
            });
            Row::new(std::iter::once(Cell::from(s.to_string())).chain(cells))
        });

        let widths = std::iter::once(Constraint::Length(4))
            .chain((0..actions).map(|_| Constraint::Length(8)));

        let table = Table::new(rows, widths)
            .header(header)
            .highlight_style(Style::new().reversed())
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Q-table"),
            );

        let mut state = TableState::default().with_selected(self.agent);
        StatefulWidget::render(table, area, buf, &mut state);
    }
}
