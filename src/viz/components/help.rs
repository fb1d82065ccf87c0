use ratatui::{prelude::*, widgets::*};

const KEYS: [(&str, &str); 6] = [
    ("  q  ", "Close the view, the run continues headless"),
    ("  h  ", "Toggle help popup"),
    ("  +  ", "Show more of the log: episode summaries, then every step"),
    ("  -  ", "Show less of the log"),
    ("PgUp ", "Page up in log history"),
    ("PgDn / Esc", "Page down / back to following the log"),
];

/// Centered popup listing the key bindings
pub fn render_help(area: Rect, buf: &mut Buffer) {
    let lines = KEYS
        .iter()
        .map(|&(key, action)| {
            Line::from(vec![
                Span::from(key).light_cyan().bold(),
                Span::raw(format!(" : {action}")),
            ])
        })
        .collect::<Vec<_>>();

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length((lines.len() + 4) as u16),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(72),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1))
                .title("Help"),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}
