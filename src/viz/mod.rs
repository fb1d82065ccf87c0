use std::{
    io::{self, stdout, Stdout},
    panic,
    time::Duration,
};

use crossterm::{
    event::{self, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{LevelFilter, SetLoggerError};
use ratatui::{backend::CrosstermBackend, prelude::*, widgets::*};

use crate::{
    error::RenderError,
    render::{self, Render},
};

use self::components::{render_help, BoardView, Component, Logs, QValues};

mod components;
mod util;

type LakeTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Route `log` records into the log pane of [`LakeView`]
///
/// Records at `level` and above are captured. Call this once, before any view is opened.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    tui_logger::init_logger(LevelFilter::Trace)?;
    tui_logger::set_default_level(level);
    Ok(())
}

/// Live terminal view of the lake, the greedy policy and the Q-table
///
/// Owns the terminal from [`new`](Self::new) until it is closed: the alternate screen in
/// raw mode, restored on close, on drop, and before a panic message is printed. Pressing
/// `q` closes the view, the run it observes carries on headless.
pub struct LakeView {
    terminal: Option<LakeTerminal>,
    logs: Logs,
    show_help: bool,
}

impl LakeView {
    pub fn new() -> Result<Self, RenderError> {
        restore_on_panic();
        execute!(stdout(), EnterAlternateScreen)?;
        enable_raw_mode()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.clear()?;

        Ok(Self {
            terminal: Some(terminal),
            logs: Logs::new(),
            show_help: false,
        })
    }

    /// Drain pending terminal events without blocking
    fn handle_events(&mut self) -> Result<(), RenderError> {
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            match util::event_keycode(&event) {
                Some(KeyCode::Char('q')) => return Err(RenderError::Closed),
                Some(KeyCode::Char('h')) => self.show_help = !self.show_help,
                _ => {
                    self.logs.handle_ui_event(&event);
                }
            }
        }
        Ok(())
    }
}

impl Render for LakeView {
    fn render(&mut self, frame: &render::Frame<'_>) -> Result<(), RenderError> {
        self.handle_events()?;
        let Some(terminal) = self.terminal.as_mut() else {
            return Err(RenderError::Closed);
        };

        let screen = Screen {
            frame,
            logs: &self.logs,
            show_help: self.show_help,
        };
        terminal.draw(|f| f.render_widget(screen, f.size()))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        if self.terminal.take().is_some() {
            leave_terminal()?;
        }
        Ok(())
    }
}

fn leave_terminal() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()
}

fn restore_on_panic() {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = leave_terminal();
        hook(info);
    }));
}

impl Drop for LakeView {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Everything on screen for a single frame
struct Screen<'a, 'f> {
    frame: &'a render::Frame<'f>,
    logs: &'a Logs,
    show_help: bool,
}

impl Widget for Screen<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [title_area, main_area, log_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Percentage(30),
            Constraint::Length(3),
        ])
        .areas(area);

        // Title
        Paragraph::new(self.frame.title)
            .bold()
            .block(Block::bordered().border_type(BorderType::Rounded))
            .render(title_area, buf);

        // Lake and Q-table
        let board = self.frame.board.as_ref();
        let lake_width = board.map_or(0, BoardView::width);
        let [lake_area, table_area] =
            Layout::horizontal([Constraint::Length(lake_width), Constraint::Fill(1)])
                .areas(main_area);
        if let Some(board) = board {
            BoardView::new(board, self.frame.q_table).render(lake_area, buf);
        }
        QValues::new(self.frame.q_table, board.and_then(|b| b.agent)).render(table_area, buf);

        self.logs.render_ref(log_area, buf);

        // Progress Bar
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Progress"),
            )
            .gauge_style(Color::Cyan)
            .ratio(self.frame.progress.clamp(0.0, 1.0))
            .render(progress_area, buf);

        if self.show_help {
            render_help(area, buf);
        }
    }
}
