mod board;
mod help;
mod log;
mod q_values;

use crossterm::event::Event;
use ratatui::{style::Color, widgets::WidgetRef};

pub use board::BoardView;
pub use help::render_help;
pub use log::Logs;
pub use q_values::QValues;

/// A widget that reacts to terminal input
pub trait Component: WidgetRef {
    /// **Returns** whether the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}

/// Color of an action's arrow and column
pub(super) fn action_color(action: usize) -> Color {
    match action % 4 {
        0 => Color::LightMagenta,
        1 => Color::LightBlue,
        2 => Color::LightGreen,
        _ => Color::LightYellow,
    }
}
