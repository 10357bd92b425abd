//! The command set for the SSD1306.
//!
//! Over I2C every byte of a command, the opcode as well as each of its parameters, travels in its
//! own command frame. Display RAM contents are the only thing sent as data.
//!
//! Note 1: The display RAM of the SSD1306 is arranged in 8 pages of 128 columns, where each column
//! of a page is one byte covering 8 vertically adjacent pixels, least significant bit on top.
//! Anywhere there is a "page" address, it refers to one of these 8-pixel-tall rows of bytes.

use log::trace;

use crate::error::{Error, Result};
use crate::interface::DisplayInterface;

pub mod consts {
    pub const NUM_PAGES: u8 = 8;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;
    pub const NUM_COM_LINES: u8 = 64;
    pub const COM_LINE_MAX: u8 = NUM_COM_LINES - 1;
    pub const NUM_COLUMNS: u8 = 128;
    pub const COLUMN_MAX: u8 = NUM_COLUMNS - 1;
}

use self::consts::*;

/// The auto-increment behavior of the RAM address pointer as data is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// The column address increments after each byte, wrapping to the next page at the end of
    /// the range set by `SetColumnAddress`.
    Horizontal,
    /// The page address increments after each byte, wrapping to the next column at the end of
    /// the range set by `SetPageAddress`.
    Vertical,
    /// The column address increments within one page and never wraps to another page.
    Page,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// COM lines scan from COM0 to COM[N-1].
    Incrementing,
    /// COM lines scan from COM[N-1] to COM0.
    Decrementing,
}

/// The wiring of the COM pins to the panel rows. This is dictated by the display module; the wrong
/// setting interleaves or repeats rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComPinLayout {
    /// COM pins drive rows in order. Used by 32- and 16-row panels.
    Sequential,
    /// COM pins alternate between the two sides of the panel. Used by 64-row panels.
    Alternative,
}

/// Horizontal direction of a continuous scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Right,
    Left,
}

#[derive(Clone, Copy, Debug)]
pub enum Command {
    /// Turn the panel on or off. While off the controller keeps its RAM and settings.
    DisplayOn(bool),
    /// Set the oscillator frequency (0-15, higher is faster) and the display clock divide ratio
    /// (1-16).
    SetClockDivider(u8, u8),
    /// Set the number of active COM lines, i.e. the number of panel rows driven.
    SetMultiplexRatio(u8),
    /// Shift the mapping of COM lines to display RAM rows. Range 0-63.
    SetDisplayOffset(u8),
    /// Set the display RAM row shown on the first panel row. Range 0-63.
    SetStartLine(u8),
    /// Enable the internal charge pump. Must be disabled when the panel has an external supply.
    ChargePump(bool),
    /// Set the RAM address pointer increment mode. See enum for details.
    SetAddressingMode(AddressingMode),
    /// When enabled, column address 127 is mapped to SEG0, mirroring the image horizontally.
    SetSegmentRemap(bool),
    /// Set the COM output scan direction. See enum for details.
    SetComScanDirection(ComScanDirection),
    /// Set the COM pin hardware layout, and whether left/right COM pins are swapped.
    SetComPinConfig(ComPinLayout, bool),
    /// Set the segment output current. Range 0-255.
    SetContrast(u8),
    /// Set the pre-charge phase 1 and phase 2 lengths, 1-15 DCLKs each.
    SetPrechargePeriod(u8, u8),
    /// Set the raw VCOMH deselect level register.
    SetVcomhDeselect(u8),
    /// When enabled every pixel lights regardless of RAM; disabling resumes showing RAM contents.
    EntireDisplayOn(bool),
    /// Invert the meaning of RAM bits: a set bit turns its pixel off.
    Invert(bool),
    /// Set the column start and end address (0-127) for data writes in horizontal or vertical
    /// mode.
    SetColumnAddress(u8, u8),
    /// Set the page start and end address for data writes in horizontal or vertical mode.
    /// Range 0-7.
    SetPageAddress(u8, u8),
    /// Configure a continuous horizontal scroll over pages `start` to `end` (0-7). Takes effect on
    /// `ActivateScroll`.
    HorizontalScroll(ScrollDirection, u8, u8),
    /// Set the rows that take part in vertical scrolling: the number of fixed rows at the top,
    /// followed by the number of scrolling rows.
    SetVerticalScrollArea(u8, u8),
    /// Configure a continuous vertical and horizontal scroll over pages `start` to `end` (0-7),
    /// moving the image up by the given number of rows per step (1-63).
    DiagonalScroll(ScrollDirection, u8, u8, u8),
    /// Start the scroll configured by the last scroll setup command.
    ActivateScroll,
    /// Stop scrolling. Display RAM must be rewritten afterwards to restore the image.
    DeactivateScroll,
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[$($arg:expr),*]) => {{
        let args: &[u8] = &[$($arg),*];
        $buf[0] = $cmd;
        $buf[1..=args.len()].copy_from_slice(args);
        Ok(&$buf[..=args.len()])
    }};
}

fn check_columns(start: u8, end: u8) -> Result<()> {
    match (start, end) {
        (0..=COLUMN_MAX, 0..=COLUMN_MAX) if start <= end => Ok(()),
        _ => Err(Error::invalid(format!(
            "column range {}..={} outside 0..={} or reversed",
            start, end, COLUMN_MAX
        ))),
    }
}

fn check_pages(start: u8, end: u8) -> Result<()> {
    match (start, end) {
        (0..=PAGE_MAX, 0..=PAGE_MAX) if start <= end => Ok(()),
        _ => Err(Error::invalid(format!(
            "page range {}..={} outside 0..={} or reversed",
            start, end, PAGE_MAX
        ))),
    }
}

impl Command {
    /// Encode the command into its opcode and parameter bytes, checking parameter ranges.
    fn encode(self, buf: &mut [u8; 8]) -> Result<&[u8]> {
        match self {
            Command::DisplayOn(on) => ok_command!(buf, if on { 0xAF } else { 0xAE }, []),
            Command::SetClockDivider(fosc, divide) => match (fosc, divide) {
                (0..=15, 1..=16) => ok_command!(buf, 0xD5, [fosc << 4 | (divide - 1)]),
                _ => Err(Error::invalid(format!(
                    "clock fosc {} / divide {} out of range",
                    fosc, divide
                ))),
            },
            Command::SetMultiplexRatio(rows) => match rows {
                1..=NUM_COM_LINES => ok_command!(buf, 0xA8, [rows - 1]),
                _ => Err(Error::invalid(format!("multiplex ratio {} out of range", rows))),
            },
            Command::SetDisplayOffset(offset) => match offset {
                0..=COM_LINE_MAX => ok_command!(buf, 0xD3, [offset]),
                _ => Err(Error::invalid(format!("display offset {} out of range", offset))),
            },
            Command::SetStartLine(line) => match line {
                0..=COM_LINE_MAX => ok_command!(buf, 0x40 | line, []),
                _ => Err(Error::invalid(format!("start line {} out of range", line))),
            },
            Command::ChargePump(enable) => {
                ok_command!(buf, 0x8D, [if enable { 0x14 } else { 0x10 }])
            }
            Command::SetAddressingMode(mode) => {
                let m = match mode {
                    AddressingMode::Horizontal => 0x00,
                    AddressingMode::Vertical => 0x01,
                    AddressingMode::Page => 0x02,
                };
                ok_command!(buf, 0x20, [m])
            }
            Command::SetSegmentRemap(remap) => ok_command!(buf, 0xA0 | remap as u8, []),
            Command::SetComScanDirection(dir) => ok_command!(
                buf,
                match dir {
                    ComScanDirection::Incrementing => 0xC0,
                    ComScanDirection::Decrementing => 0xC8,
                },
                []
            ),
            Command::SetComPinConfig(layout, lr_remap) => {
                let alt = match layout {
                    ComPinLayout::Sequential => 0x00,
                    ComPinLayout::Alternative => 0x10,
                };
                let remap = if lr_remap { 0x20 } else { 0x00 };
                ok_command!(buf, 0xDA, [0x02 | alt | remap])
            }
            Command::SetContrast(contrast) => ok_command!(buf, 0x81, [contrast]),
            Command::SetPrechargePeriod(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(buf, 0xD9, [phase_2 << 4 | phase_1]),
                _ => Err(Error::invalid(format!(
                    "pre-charge phases {}, {} out of range",
                    phase_1, phase_2
                ))),
            },
            Command::SetVcomhDeselect(level) => ok_command!(buf, 0xDB, [level]),
            Command::EntireDisplayOn(on) => ok_command!(buf, if on { 0xA5 } else { 0xA4 }, []),
            Command::Invert(inv) => ok_command!(buf, if inv { 0xA7 } else { 0xA6 }, []),
            Command::SetColumnAddress(start, end) => {
                check_columns(start, end)?;
                ok_command!(buf, 0x21, [start, end])
            }
            Command::SetPageAddress(start, end) => {
                check_pages(start, end)?;
                ok_command!(buf, 0x22, [start, end])
            }
            Command::HorizontalScroll(dir, start, end) => {
                check_pages(start, end)?;
                let op = match dir {
                    ScrollDirection::Right => 0x26,
                    ScrollDirection::Left => 0x27,
                };
                // Dummy byte, start page, frame interval, end page, two more dummy bytes.
                ok_command!(buf, op, [0x00, start, 0x00, end, 0x00, 0xFF])
            }
            Command::SetVerticalScrollArea(fixed, scrolling) => {
                ok_command!(buf, 0xA3, [fixed, scrolling])
            }
            Command::DiagonalScroll(dir, start, end, step) => {
                check_pages(start, end)?;
                match step {
                    1..=COM_LINE_MAX => {}
                    _ => {
                        return Err(Error::invalid(format!(
                            "vertical scroll step {} out of range",
                            step
                        )))
                    }
                }
                let op = match dir {
                    ScrollDirection::Right => 0x29,
                    ScrollDirection::Left => 0x2A,
                };
                ok_command!(buf, op, [0x00, start, 0x00, end, step])
            }
            Command::ActivateScroll => ok_command!(buf, 0x2F, []),
            Command::DeactivateScroll => ok_command!(buf, 0x2E, []),
        }
    }

    /// Validate the command and transmit it. Nothing reaches the bus when a parameter is out of
    /// range.
    pub fn send<DI>(self, iface: &mut DI) -> Result<()>
    where
        DI: DisplayInterface,
    {
        let mut buf = [0u8; 8];
        let bytes = self.encode(&mut buf)?;
        trace!("{:?} -> {:02x?}", self, bytes);
        for &b in bytes {
            iface.send_command(b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    fn sent_bytes(cmd: Command) -> Result<Vec<u8>> {
        let mut di = TestSpyInterface::new();
        cmd.send(&mut di)?;
        Ok(di
            .sent()
            .into_iter()
            .map(|s| match s {
                Sent::Cmd(b) => b,
                Sent::Data(_) => panic!("command sent data"),
            })
            .collect())
    }

    #[test]
    fn display_on_off() {
        assert_eq!(sent_bytes(Command::DisplayOn(false)).unwrap(), [0xAE]);
        assert_eq!(sent_bytes(Command::DisplayOn(true)).unwrap(), [0xAF]);
    }

    #[test]
    fn set_clock_divider() {
        assert_eq!(
            sent_bytes(Command::SetClockDivider(8, 1)).unwrap(),
            [0xD5, 0x80]
        );
        assert_eq!(
            sent_bytes(Command::SetClockDivider(15, 16)).unwrap(),
            [0xD5, 0xFF]
        );
        assert!(sent_bytes(Command::SetClockDivider(16, 1)).is_err());
        assert!(sent_bytes(Command::SetClockDivider(8, 0)).is_err());
        assert!(sent_bytes(Command::SetClockDivider(8, 17)).is_err());
    }

    #[test]
    fn set_multiplex_ratio() {
        assert_eq!(
            sent_bytes(Command::SetMultiplexRatio(64)).unwrap(),
            [0xA8, 63]
        );
        assert_eq!(
            sent_bytes(Command::SetMultiplexRatio(16)).unwrap(),
            [0xA8, 15]
        );
        assert!(sent_bytes(Command::SetMultiplexRatio(0)).is_err());
        assert!(sent_bytes(Command::SetMultiplexRatio(65)).is_err());
    }

    #[test]
    fn set_start_line_and_offset() {
        assert_eq!(sent_bytes(Command::SetStartLine(0)).unwrap(), [0x40]);
        assert_eq!(sent_bytes(Command::SetStartLine(63)).unwrap(), [0x7F]);
        assert!(sent_bytes(Command::SetStartLine(64)).is_err());
        assert_eq!(
            sent_bytes(Command::SetDisplayOffset(23)).unwrap(),
            [0xD3, 23]
        );
        assert!(sent_bytes(Command::SetDisplayOffset(64)).is_err());
    }

    #[test]
    fn charge_pump() {
        assert_eq!(
            sent_bytes(Command::ChargePump(true)).unwrap(),
            [0x8D, 0x14]
        );
        assert_eq!(
            sent_bytes(Command::ChargePump(false)).unwrap(),
            [0x8D, 0x10]
        );
    }

    #[test]
    fn addressing_and_remap() {
        assert_eq!(
            sent_bytes(Command::SetAddressingMode(AddressingMode::Horizontal)).unwrap(),
            [0x20, 0x00]
        );
        assert_eq!(
            sent_bytes(Command::SetAddressingMode(AddressingMode::Page)).unwrap(),
            [0x20, 0x02]
        );
        assert_eq!(sent_bytes(Command::SetSegmentRemap(true)).unwrap(), [0xA1]);
        assert_eq!(
            sent_bytes(Command::SetComScanDirection(ComScanDirection::Decrementing)).unwrap(),
            [0xC8]
        );
    }

    #[test]
    fn com_pin_config() {
        assert_eq!(
            sent_bytes(Command::SetComPinConfig(ComPinLayout::Sequential, false)).unwrap(),
            [0xDA, 0x02]
        );
        assert_eq!(
            sent_bytes(Command::SetComPinConfig(ComPinLayout::Alternative, false)).unwrap(),
            [0xDA, 0x12]
        );
        assert_eq!(
            sent_bytes(Command::SetComPinConfig(ComPinLayout::Alternative, true)).unwrap(),
            [0xDA, 0x32]
        );
    }

    #[test]
    fn set_precharge_period() {
        assert_eq!(
            sent_bytes(Command::SetPrechargePeriod(2, 2)).unwrap(),
            [0xD9, 0x22]
        );
        assert_eq!(
            sent_bytes(Command::SetPrechargePeriod(1, 15)).unwrap(),
            [0xD9, 0xF1]
        );
        assert!(sent_bytes(Command::SetPrechargePeriod(0, 2)).is_err());
        assert!(sent_bytes(Command::SetPrechargePeriod(2, 16)).is_err());
    }

    #[test]
    fn address_ranges() {
        assert_eq!(
            sent_bytes(Command::SetColumnAddress(0, 127)).unwrap(),
            [0x21, 0, 127]
        );
        assert_eq!(
            sent_bytes(Command::SetPageAddress(0, 7)).unwrap(),
            [0x22, 0, 7]
        );
        assert!(sent_bytes(Command::SetColumnAddress(0, 128)).is_err());
        assert!(sent_bytes(Command::SetColumnAddress(0, 199)).is_err());
        assert!(sent_bytes(Command::SetColumnAddress(10, 9)).is_err());
        assert!(sent_bytes(Command::SetPageAddress(0, 8)).is_err());
        assert!(sent_bytes(Command::SetPageAddress(3, 2)).is_err());
    }

    #[test]
    fn horizontal_scroll() {
        assert_eq!(
            sent_bytes(Command::HorizontalScroll(ScrollDirection::Right, 0, 7)).unwrap(),
            [0x26, 0x00, 0, 0x00, 7, 0x00, 0xFF]
        );
        assert_eq!(
            sent_bytes(Command::HorizontalScroll(ScrollDirection::Left, 2, 5)).unwrap(),
            [0x27, 0x00, 2, 0x00, 5, 0x00, 0xFF]
        );
        assert!(sent_bytes(Command::HorizontalScroll(ScrollDirection::Left, 0, 8)).is_err());
    }

    #[test]
    fn diagonal_scroll() {
        assert_eq!(
            sent_bytes(Command::DiagonalScroll(ScrollDirection::Right, 0, 7, 1)).unwrap(),
            [0x29, 0x00, 0, 0x00, 7, 0x01]
        );
        assert_eq!(
            sent_bytes(Command::DiagonalScroll(ScrollDirection::Left, 1, 3, 1)).unwrap(),
            [0x2A, 0x00, 1, 0x00, 3, 0x01]
        );
        assert!(sent_bytes(Command::DiagonalScroll(ScrollDirection::Left, 0, 7, 0)).is_err());
        assert!(sent_bytes(Command::DiagonalScroll(ScrollDirection::Left, 0, 7, 64)).is_err());
    }

    #[test]
    fn invalid_command_sends_nothing() {
        let mut di = TestSpyInterface::new();
        assert!(matches!(
            Command::SetPageAddress(9, 9).send(&mut di),
            Err(Error::InvalidArgument(_))
        ));
        assert!(di.sent().is_empty());
    }

    #[test]
    fn single_byte_commands() {
        assert_eq!(sent_bytes(Command::EntireDisplayOn(false)).unwrap(), [0xA4]);
        assert_eq!(sent_bytes(Command::Invert(false)).unwrap(), [0xA6]);
        assert_eq!(sent_bytes(Command::Invert(true)).unwrap(), [0xA7]);
        assert_eq!(sent_bytes(Command::ActivateScroll).unwrap(), [0x2F]);
        assert_eq!(sent_bytes(Command::DeactivateScroll).unwrap(), [0x2E]);
        assert_eq!(
            sent_bytes(Command::SetVcomhDeselect(0x40)).unwrap(),
            [0xDB, 0x40]
        );
        assert_eq!(
            sent_bytes(Command::SetVerticalScrollArea(0, 64)).unwrap(),
            [0xA3, 0, 64]
        );
    }
}
