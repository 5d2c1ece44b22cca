//! Linear dialogue cursor.
//!
//! Walks an ordered list of lines one step at a time. Advancing past the last
//! line clamps the cursor to it and marks the dialogue finished. There is no
//! branching.

use crate::resources::drawqueue::DrawQueue;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialogue {
    lines: Vec<String>,
    cursor: usize,
    finished: bool,
}

impl Dialogue {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Dialogue {
            lines: lines.into_iter().map(Into::into).collect(),
            cursor: 0,
            finished: false,
        }
    }

    /// Advance one line. Past the end, stay on the last line and finish.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.cursor += 1;
        let last = self.lines.len().saturating_sub(1);
        if self.cursor > last {
            self.cursor = last;
            self.finished = true;
        }
    }

    pub fn current_line(&self) -> Option<&str> {
        self.lines.get(self.cursor).map(String::as_str)
    }

    /// Zero-based index of the current line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.finished = false;
    }

    /// Render the current line as text at `(x, y)`.
    pub fn draw(&self, draw: &mut DrawQueue, x: f32, y: f32) {
        if let Some(line) = self.current_line() {
            draw.text(line, x, y);
        }
    }
}
