//! Driver library for the Solomon Systech SSD1306 monochrome dot matrix OLED controller, attached
//! over I2C.
//!
//! Drawing happens in an in-memory frame buffer laid out exactly like the controller's display
//! RAM; `Display::flush` sends the whole buffer in one transfer. Drawing never fails: pixels
//! outside the panel are dropped.

extern crate embedded_hal as hal;

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod interface;
pub mod session;

// Re-exports for primary API.
pub use crate::command::{consts, ComScanDirection, ScrollDirection};
pub use crate::config::{Config, DisplaySize, PowerMode};
pub use crate::display::framebuffer::{Color, FrameBuffer};
pub use crate::display::text::TextStyle;
pub use crate::display::Display;
pub use crate::error::{Error, Result};
pub use crate::interface::i2c::I2cInterface;
#[cfg(target_os = "linux")]
pub use linux_embedded_hal::I2cdev;
pub use crate::interface::{DisplayInterface, ALTERNATE_ADDRESS, DEFAULT_ADDRESS};
pub use crate::session::Session;
#[cfg(target_os = "linux")]
pub use crate::session::DEFAULT_BUS;
