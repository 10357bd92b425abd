//! Cursor-driven text rendering on top of the glyph table.

use crate::display::framebuffer::{Color, FrameBuffer};
use crate::font::{ADVANCE, GLYPH_HEIGHT};

/// Text state: where the next glyph goes and how it is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) scale: u8,
    pub(crate) color: Color,
    pub(crate) background: Color,
    pub(crate) wrap: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            x: 0,
            y: 0,
            scale: 1,
            color: Color::On,
            background: Color::Off,
            wrap: true,
        }
    }
}

impl TextStyle {
    pub fn cursor(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn color(&self) -> (Color, Color) {
        (self.color, self.background)
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    fn advance(&self) -> i32 {
        i32::from(ADVANCE) * i32::from(self.scale)
    }

    fn line_height(&self) -> i32 {
        i32::from(GLYPH_HEIGHT) * i32::from(self.scale)
    }

    fn newline(&mut self) {
        self.x = 0;
        self.y = self.y.saturating_add(self.line_height());
    }

    /// Render `text` at the cursor, advancing it. `\n` starts a new line, `\r` returns to the left
    /// edge. Once the cursor is at or below the bottom edge the rest of the text is dropped.
    pub fn print(&mut self, fb: &mut FrameBuffer, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => self.newline(),
                '\r' => self.x = 0,
                _ => {
                    let right = self.x.saturating_add(self.advance());
                    if self.wrap && right > i32::from(fb.width()) {
                        self.newline();
                    }
                    if self.y >= i32::from(fb.height()) {
                        break;
                    }
                    fb.draw_glyph(self.x, self.y, c, self.color, self.background, self.scale);
                    self.x = self.x.saturating_add(self.advance());
                }
            }
        }
    }
}
