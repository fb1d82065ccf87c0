mod board;
mod text;

pub use board::{action_symbol, Board, Tile};
pub use text::{frame_lines, TextRenderer};

use log::warn;

use crate::{algo::QTable, error::RenderError};

/// Everything a renderer gets to see of a single step
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub title: &'a str,
    pub q_table: &'a QTable,
    pub board: Option<Board>,
    /// Fraction of the current run completed, in `[0,1]`
    pub progress: f64,
}

/// A read-only observer of the learning loops
pub trait Render {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError>;

    /// Release whatever the renderer holds, called once when it is dropped from a run
    fn close(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Renders nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Render for Headless {
    fn render(&mut self, _frame: &Frame<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Shields the loops from their renderer
///
/// The first failed render logs a warning, closes the renderer and switches to headless
/// operation for the rest of the run.
#[derive(Debug)]
pub struct Visualizer<R: Render> {
    renderer: Option<R>,
}

impl Visualizer<Headless> {
    pub fn headless() -> Self {
        Self { renderer: None }
    }
}

impl<R: Render> Visualizer<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer: Some(renderer),
        }
    }

    /// Whether frames are still being rendered
    pub fn is_active(&self) -> bool {
        self.renderer.is_some()
    }

    /// Build and render a frame, the frame is only built while a renderer is active
    pub fn show<'a>(&mut self, frame: impl FnOnce() -> Frame<'a>) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        if let Err(err) = renderer.render(&frame()) {
            warn!("Rendering failed, continuing headless: {err}");
            self.shutdown();
        }
    }

    /// Close the renderer and stop rendering
    pub fn shutdown(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            if let Err(err) = renderer.close() {
                warn!("Closing renderer failed: {err}");
            }
        }
    }
}

impl<R: Render> Drop for Visualizer<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records titles and fails once `fail_after` frames were rendered
    #[derive(Default)]
    pub struct Recorder {
        pub titles: Vec<String>,
        pub fail_after: Option<usize>,
        pub closed: bool,
    }

    impl Render for &mut Recorder {
        fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
            if self.fail_after == Some(self.titles.len()) {
                return Err(RenderError::Closed);
            }
            self.titles.push(frame.title.to_owned());
            Ok(())
        }

        fn close(&mut self) -> Result<(), RenderError> {
            self.closed = true;
            Ok(())
        }
    }

    fn frame(table: &QTable) -> Frame<'_> {
        Frame {
            title: "t",
            q_table: table,
            board: None,
            progress: 0.0,
        }
    }

    #[test]
    fn visualizer_degrades_to_headless() {
        let table = QTable::new(1, 1);
        let mut recorder = Recorder {
            fail_after: Some(2),
            ..Default::default()
        };

        {
            let mut view = Visualizer::new(&mut recorder);
            for _ in 0..5 {
                view.show(|| frame(&table));
            }
            assert!(!view.is_active(), "renderer dropped after failure");
        }

        assert_eq!(recorder.titles.len(), 2, "no frames after the failure");
        assert!(recorder.closed, "renderer closed on failure");
    }

    #[test]
    fn headless_builds_no_frames() {
        let mut view = Visualizer::headless();
        assert!(!view.is_active());
        view.show(|| unreachable!("frame built while headless"));
    }
}
