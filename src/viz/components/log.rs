use crossterm::event::{Event, KeyCode};
use log::LevelFilter;
use ratatui::{prelude::*, widgets::*};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget, TuiWidgetEvent, TuiWidgetState};

use crate::viz::util::event_keycode;

use super::Component;

/// Levels the pane steps through, from quiet to per-step lake transitions
const LEVELS: [LevelFilter; 4] = [
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// Log pane fed by [`init_logger`](crate::viz::init_logger)
///
/// Shows run progress at `info` by default, `+` adds the per-episode summaries and then
/// the per-step transitions, `-` takes them away again.
pub struct Logs {
    state: TuiWidgetState,
    level: usize,
}

impl Logs {
    pub fn new() -> Self {
        Self::with_level(1)
    }

    fn with_level(level: usize) -> Self {
        Self {
            state: TuiWidgetState::new().set_default_display_level(LEVELS[level]),
            level,
        }
    }

    /// The most verbose level shown
    pub fn level(&self) -> LevelFilter {
        LEVELS[self.level]
    }

    fn set_level(&mut self, level: usize) {
        if level != self.level {
            *self = Self::with_level(level);
        }
    }
}

impl WidgetRef for Logs {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        TuiLoggerWidget::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(format!("Log [{}]", self.level())),
            )
            .style_error(Style::default().light_red())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .style_debug(Style::default().gray())
            .style_trace(Style::default().dark_gray())
            .output_separator(' ')
            .output_timestamp(Some("%H:%M:%S".to_string()))
            .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
            .output_target(false)
            .state(&self.state)
            .render(area, buf);
    }
}

impl Component for Logs {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        let Some(key) = event_keycode(event) else {
            return false;
        };

        match key {
            KeyCode::Char('+') => self.set_level((self.level + 1).min(LEVELS.len() - 1)),
            KeyCode::Char('-') => self.set_level(self.level.saturating_sub(1)),
            KeyCode::PageUp => self.state.transition(TuiWidgetEvent::PrevPageKey),
            KeyCode::PageDown => self.state.transition(TuiWidgetEvent::NextPageKey),
            KeyCode::Esc => self.state.transition(TuiWidgetEvent::EscapeKey),
            _ => return false,
        }
        true
    }
}
