//! Defines the configuration a display is brought up with: panel geometry, power supply mode, and
//! the initialization register values that follow from them.

use crate::command::ComPinLayout;
use crate::error::{Error, Result};

/// How the panel's OLED drive voltage is supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerMode {
    /// VCC is supplied externally; the charge pump stays off.
    ExternalVcc,
    /// VCC is generated by the controller's internal charge pump from the 3.3V supply.
    SwitchCapVcc,
}

/// Standard SSD1306 panel sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplaySize {
    Size128x64,
    Size128x32,
    Size96x16,
}

impl DisplaySize {
    pub fn dimensions(self) -> (u8, u8) {
        match self {
            DisplaySize::Size128x64 => (128, 64),
            DisplaySize::Size128x32 => (128, 32),
            DisplaySize::Size96x16 => (96, 16),
        }
    }
}

/// A configuration for the display. The geometry is mandatory; the power mode defaults to the
/// internal charge pump, and the start-up contrast defaults to a value suited to the power mode.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    width: u8,
    height: u8,
    power_mode: PowerMode,
    contrast: Option<u8>,
}

impl Config {
    /// Create a configuration for a `width` x `height` panel. `height` must be a non-zero multiple
    /// of 8, since the display RAM is organized in 8-row pages.
    pub fn new(width: u8, height: u8) -> Result<Self> {
        if width == 0 || height == 0 || height % 8 != 0 {
            return Err(Error::invalid(format!(
                "unsupported geometry {}x{}: height must be a non-zero multiple of 8",
                width, height
            )));
        }
        Ok(Config {
            width,
            height,
            power_mode: PowerMode::SwitchCapVcc,
            contrast: None,
        })
    }

    pub fn preset(size: DisplaySize) -> Self {
        let (width, height) = size.dimensions();
        Config {
            width,
            height,
            power_mode: PowerMode::SwitchCapVcc,
            contrast: None,
        }
    }

    /// Extend this `Config` with the panel's power supply mode.
    pub fn power_mode(self, power_mode: PowerMode) -> Self {
        Self { power_mode, ..self }
    }

    /// Extend this `Config` to start up with an explicit contrast instead of the power mode's
    /// default.
    pub fn contrast(self, contrast: u8) -> Self {
        Self {
            contrast: Some(contrast),
            ..self
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn pages(&self) -> u8 {
        self.height / 8
    }

    pub(crate) fn mode(&self) -> PowerMode {
        self.power_mode
    }

    /// Contrast sent during initialization.
    pub(crate) fn initial_contrast(&self) -> u8 {
        self.contrast.unwrap_or(match self.power_mode {
            PowerMode::ExternalVcc => 0x9F,
            PowerMode::SwitchCapVcc => 0xCF,
        })
    }

    pub(crate) fn charge_pump(&self) -> bool {
        self.power_mode == PowerMode::SwitchCapVcc
    }

    /// Pre-charge (phase 1, phase 2) lengths in DCLKs.
    pub(crate) fn precharge(&self) -> (u8, u8) {
        match self.power_mode {
            PowerMode::ExternalVcc => (2, 2),
            PowerMode::SwitchCapVcc => (1, 15),
        }
    }

    pub(crate) fn com_pins(&self) -> ComPinLayout {
        match self.height {
            32 | 16 => ComPinLayout::Sequential,
            _ => ComPinLayout::Alternative,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::preset(DisplaySize::Size128x64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_validation() {
        assert!(Config::new(128, 64).is_ok());
        assert!(Config::new(64, 48).is_ok());
        assert!(Config::new(128, 0).is_err());
        assert!(Config::new(0, 64).is_err());
        assert!(matches!(
            Config::new(128, 60),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn presets() {
        let cfg = Config::preset(DisplaySize::Size96x16);
        assert_eq!((cfg.width(), cfg.height(), cfg.pages()), (96, 16, 2));
        let cfg = Config::default();
        assert_eq!((cfg.width(), cfg.height(), cfg.pages()), (128, 64, 8));
    }

    #[test]
    fn power_mode_constants() {
        let internal = Config::default();
        assert!(internal.charge_pump());
        assert_eq!(internal.initial_contrast(), 0xCF);
        assert_eq!(internal.precharge(), (1, 15));

        let external = Config::default().power_mode(PowerMode::ExternalVcc);
        assert!(!external.charge_pump());
        assert_eq!(external.initial_contrast(), 0x9F);
        assert_eq!(external.precharge(), (2, 2));

        assert_eq!(external.contrast(10).initial_contrast(), 10);
    }

    #[test]
    fn com_pins_follow_height() {
        assert_eq!(
            Config::preset(DisplaySize::Size128x32).com_pins(),
            ComPinLayout::Sequential
        );
        assert_eq!(
            Config::preset(DisplaySize::Size96x16).com_pins(),
            ComPinLayout::Sequential
        );
        assert_eq!(Config::default().com_pins(), ComPinLayout::Alternative);
        assert_eq!(
            Config::new(128, 48).unwrap().com_pins(),
            ComPinLayout::Alternative
        );
    }
}
