//! The main API to the display driver. A `Display` owns the bus interface and an in-memory frame
//! buffer; drawing only touches the buffer, and `flush` pushes the whole buffer to display RAM.

// This has to be here in order to be usable by mods declared afterwards.
#[cfg(test)]
#[macro_use]
pub mod testing {
    macro_rules! send {
        ([$($d:tt),*]) => {Sent::Data(vec![$($d,)*])};
        ($c:tt) => {Sent::Cmd($c)};
    }
    macro_rules! sends {
        ($($e:tt),*) => {&[$(send!($e),)*]};
    }
}

pub mod framebuffer;
pub mod text;

use log::{debug, warn};

use crate::command::*;
use crate::config::{Config, PowerMode};
use crate::display::framebuffer::{Color, FrameBuffer};
use crate::display::text::TextStyle;
use crate::error::{Error, Result};
use crate::interface;

/// Oscillator frequency setting used at start-up; with a divide ratio of 1 this is the chip's
/// reset value of 0x80.
const CLOCK_FOSC: u8 = 8;
/// VCOMH deselect level register value used at start-up.
const VCOMH_DESELECT: u8 = 0x40;

/// A driver for an SSD1306 display.
pub struct Display<DI>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
    config: Config,
    buffer: FrameBuffer,
    text: TextStyle,
    contrast: u8,
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Construct a new display driver for a panel described by `config`, which is connected to
    /// the interface `iface`. Nothing is sent until `init`.
    pub fn new(iface: DI, config: Config) -> Self {
        Display {
            iface,
            buffer: FrameBuffer::new(config.width(), config.height()),
            text: TextStyle::default(),
            contrast: config.initial_contrast(),
            config,
        }
    }

    /// Bring the controller from reset to an active, normally oriented display in horizontal
    /// addressing mode. Stops at the first command that fails.
    pub fn init(&mut self) -> Result<()> {
        debug!(
            "initializing {}x{} display ({:?})",
            self.config.width(),
            self.config.height(),
            self.config.mode()
        );
        let (phase_1, phase_2) = self.config.precharge();
        let sequence = [
            Command::DisplayOn(false),
            Command::SetClockDivider(CLOCK_FOSC, 1),
            Command::SetMultiplexRatio(self.config.height()),
            Command::SetDisplayOffset(0),
            Command::SetStartLine(0),
            Command::ChargePump(self.config.charge_pump()),
            Command::SetAddressingMode(AddressingMode::Horizontal),
            Command::SetSegmentRemap(true),
            Command::SetComScanDirection(ComScanDirection::Decrementing),
            Command::SetComPinConfig(self.config.com_pins(), false),
            Command::SetContrast(self.contrast),
            Command::SetPrechargePeriod(phase_1, phase_2),
            Command::SetVcomhDeselect(VCOMH_DESELECT),
            Command::EntireDisplayOn(false),
            Command::Invert(false),
            Command::DeactivateScroll,
            Command::DisplayOn(true),
        ];
        for &cmd in sequence.iter() {
            cmd.send(&mut self.iface)?;
        }
        Ok(())
    }

    /// Power the panel off and hand back the interface. A failure to power off is logged, not
    /// returned, so the interface is always recovered.
    pub fn release(mut self) -> DI {
        debug!("releasing display");
        if let Err(e) = Command::DisplayOn(false).send(&mut self.iface) {
            warn!("failed to power off display: {}", e);
        }
        self.iface
    }

    /// Push the whole frame buffer to display RAM: set the column and page windows to the full
    /// panel, then send the buffer as one data transfer. The buffer is untouched, so a failed
    /// flush can simply be retried.
    pub fn flush(&mut self) -> Result<()> {
        let last_col = self.buffer.width() - 1;
        let last_page = self.buffer.pages() - 1;
        debug!("flushing {} bytes", self.buffer.as_bytes().len());
        Command::SetColumnAddress(0, last_col).send(&mut self.iface)?;
        Command::SetPageAddress(0, last_page).send(&mut self.iface)?;
        self.iface.send_data(self.buffer.as_bytes())
    }

    /// Clear the frame buffer. The panel is unchanged until the next `flush`.
    pub fn clear(&mut self) {
        self.buffer.clear()
    }

    /// Toggle the controller's inverse display mode. The frame buffer is unaffected.
    pub fn invert(&mut self, inverted: bool) -> Result<()> {
        Command::Invert(inverted).send(&mut self.iface)
    }

    /// Drop the contrast to zero, or restore the stored contrast. The stored value is never
    /// changed by dimming.
    pub fn dim(&mut self, dim: bool) -> Result<()> {
        let contrast = if dim { 0 } else { self.contrast };
        Command::SetContrast(contrast).send(&mut self.iface)
    }

    /// Set and remember the contrast. Values outside 0-255 are rejected without touching the
    /// stored value or the bus.
    pub fn set_contrast(&mut self, contrast: i32) -> Result<()> {
        if contrast < 0 || contrast > 255 {
            return Err(Error::invalid(format!(
                "contrast {} outside 0..=255",
                contrast
            )));
        }
        let contrast = contrast as u8;
        Command::SetContrast(contrast).send(&mut self.iface)?;
        self.contrast = contrast;
        Ok(())
    }

    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    pub fn power_mode(&self) -> PowerMode {
        self.config.mode()
    }

    pub fn width(&self) -> u8 {
        self.buffer.width()
    }

    pub fn height(&self) -> u8 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.buffer.set_pixel(x, y, color)
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.buffer.get_pixel(x, y)
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.buffer.draw_line(x0, y0, x1, y1, color)
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.buffer.draw_rect(x, y, w, h, color)
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.buffer.fill_rect(x, y, w, h, color)
    }

    pub fn draw_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        self.buffer.draw_circle(x0, y0, r, color)
    }

    pub fn fill_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        self.buffer.fill_circle(x0, y0, r, color)
    }

    /// Draw one character at `(x, y)` using the current text colors and size. The cursor does not
    /// move.
    pub fn draw_char(&mut self, x: i32, y: i32, c: char) {
        let TextStyle {
            color,
            background,
            scale,
            ..
        } = self.text;
        self.buffer.draw_glyph(x, y, c, color, background, scale)
    }

    /// Print `text` at the cursor. See `TextStyle::print`.
    pub fn print(&mut self, text: &str) {
        self.text.print(&mut self.buffer, text)
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.text.x = x;
        self.text.y = y;
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.text.cursor()
    }

    /// Set the glyph magnification. A size of zero is treated as 1.
    pub fn set_text_size(&mut self, size: u8) {
        self.text.scale = size.max(1);
    }

    /// Set the glyph color, and the color painted behind it. Passing the same color for both
    /// draws text with a transparent background.
    pub fn set_text_color(&mut self, color: Color, background: Color) {
        self.text.color = color;
        self.text.background = background;
    }

    pub fn set_text_wrap(&mut self, wrap: bool) {
        self.text.wrap = wrap;
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text
    }

    /// Start a continuous rightward scroll of pages `start` to `stop` (0-7).
    pub fn start_scroll_right(&mut self, start: u8, stop: u8) -> Result<()> {
        self.start_horizontal_scroll(ScrollDirection::Right, start, stop)
    }

    /// Start a continuous leftward scroll of pages `start` to `stop` (0-7).
    pub fn start_scroll_left(&mut self, start: u8, stop: u8) -> Result<()> {
        self.start_horizontal_scroll(ScrollDirection::Left, start, stop)
    }

    /// Start a continuous up-and-right scroll of pages `start` to `stop` (0-7), with the whole
    /// panel height in the vertical scroll area.
    pub fn start_scroll_diag_right(&mut self, start: u8, stop: u8) -> Result<()> {
        self.start_diagonal_scroll(ScrollDirection::Right, start, stop)
    }

    /// Start a continuous up-and-left scroll of pages `start` to `stop` (0-7), with the whole
    /// panel height in the vertical scroll area.
    pub fn start_scroll_diag_left(&mut self, start: u8, stop: u8) -> Result<()> {
        self.start_diagonal_scroll(ScrollDirection::Left, start, stop)
    }

    pub fn stop_scroll(&mut self) -> Result<()> {
        Command::DeactivateScroll.send(&mut self.iface)
    }

    fn start_horizontal_scroll(&mut self, dir: ScrollDirection, start: u8, stop: u8) -> Result<()> {
        Command::HorizontalScroll(dir, start, stop).send(&mut self.iface)?;
        Command::ActivateScroll.send(&mut self.iface)
    }

    fn start_diagonal_scroll(&mut self, dir: ScrollDirection, start: u8, stop: u8) -> Result<()> {
        let rows = self.buffer.height();
        Command::SetVerticalScrollArea(0, rows).send(&mut self.iface)?;
        Command::DiagonalScroll(dir, start, stop, 1).send(&mut self.iface)?;
        Command::ActivateScroll.send(&mut self.iface)
    }
}
