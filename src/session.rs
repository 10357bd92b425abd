//! Begin/end lifecycle around a single display. A `Session` holds at most one initialized
//! `Display`; every access to an inactive session fails with `Error::NotInitialized` before any
//! bus traffic. Sessions are owned by the caller, so independent displays each get their own.

use log::debug;

use crate::config::Config;
use crate::display::Display;
use crate::error::{Error, Result};
use crate::interface::DisplayInterface;

pub struct Session<DI>
where
    DI: DisplayInterface,
{
    display: Option<Display<DI>>,
}

impl<DI> Session<DI>
where
    DI: DisplayInterface,
{
    pub fn new() -> Self {
        Session { display: None }
    }

    /// Initialize a display on `iface`. Any display already active in this session is ended
    /// first. If initialization fails, the buffer and interface are dropped and the session is
    /// left inactive.
    pub fn begin(&mut self, iface: DI, config: Config) -> Result<()> {
        self.end();
        let mut display = Display::new(iface, config);
        match display.init() {
            Ok(()) => {
                self.display = Some(display);
                Ok(())
            }
            Err(e) => {
                debug!("display initialization failed: {}", e);
                Err(e)
            }
        }
    }

    /// Power off and drop the active display, if any. Returns the interface it was using.
    pub fn end(&mut self) -> Option<DI> {
        self.display.take().map(Display::release)
    }

    pub fn is_active(&self) -> bool {
        self.display.is_some()
    }

    pub fn display(&self) -> Result<&Display<DI>> {
        self.display.as_ref().ok_or(Error::NotInitialized)
    }

    pub fn display_mut(&mut self) -> Result<&mut Display<DI>> {
        self.display.as_mut().ok_or(Error::NotInitialized)
    }
}

impl<DI> Default for Session<DI>
where
    DI: DisplayInterface,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<DI> Drop for Session<DI>
where
    DI: DisplayInterface,
{
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use linux_embedded_hal::I2cdev;

    use super::Session;
    use crate::config::Config;
    use crate::error::Result;
    use crate::interface::i2c::I2cInterface;
    use crate::interface::linux::open_bus;

    /// Bus number used when none is given.
    pub const DEFAULT_BUS: u8 = 1;

    impl Session<I2cInterface<I2cdev>> {
        /// Open `/dev/i2c-<bus>` and begin a display at `address` on it. Any display already
        /// active in this session is ended before the bus is opened.
        pub fn begin_bus(&mut self, bus: u8, address: u8, config: Config) -> Result<()> {
            self.end();
            let iface = I2cInterface::new(open_bus(bus)?, address)?;
            self.begin(iface, config)
        }
    }
}

#[cfg(target_os = "linux")]
pub use self::linux::DEFAULT_BUS;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplaySize;
    use crate::display::framebuffer::Color;
    use crate::interface::i2c::I2cInterface;
    use crate::interface::test_spy::{FakeBus, Sent, TestSpyInterface};

    #[test]
    fn inactive_session_is_not_initialized() {
        let mut session: Session<TestSpyInterface> = Session::new();
        assert!(!session.is_active());
        assert_eq!(session.display().err(), Some(Error::NotInitialized));
        assert!(matches!(
            session.display_mut().and_then(|d| d.flush()),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(
            session.display_mut().and_then(|d| d.set_contrast(10)),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn begin_draw_end() {
        let _ = env_logger::builder().is_test(true).try_init();
        let di = TestSpyInterface::new();
        let mut session = Session::new();
        session
            .begin(di.split(), Config::preset(DisplaySize::Size128x32))
            .unwrap();
        assert!(session.is_active());

        let disp = session.display_mut().unwrap();
        assert_eq!((disp.width(), disp.height()), (128, 32));
        disp.fill_circle(64, 16, 4, Color::On);
        disp.flush().unwrap();

        session.end().unwrap();
        assert!(!session.is_active());
        assert_eq!(di.sent().last(), Some(&Sent::Cmd(0xAE)));

        // Ending again does nothing.
        let before = di.sent().len();
        assert!(session.end().is_none());
        assert_eq!(di.sent().len(), before);
    }

    #[test]
    fn failed_begin_leaves_session_inactive() {
        let di = TestSpyInterface::new();
        di.fail_after(3);
        let mut session = Session::new();
        assert!(matches!(
            session.begin(di.split(), Config::default()),
            Err(Error::Io(_))
        ));
        assert!(!session.is_active());
        // No power-off was attempted on the failure path.
        assert_eq!(di.sent().len(), 3);
    }

    #[test]
    fn rebegin_ends_previous_display() {
        let first = TestSpyInterface::new();
        let second = TestSpyInterface::new();
        let mut session = Session::new();
        session.begin(first.split(), Config::default()).unwrap();
        session.begin(second.split(), Config::default()).unwrap();
        assert_eq!(first.sent().last(), Some(&Sent::Cmd(0xAE)));
        assert_eq!(second.sent().last(), Some(&Sent::Cmd(0xAF)));
    }

    #[test]
    fn drop_powers_off() {
        let di = TestSpyInterface::new();
        {
            let mut session = Session::new();
            session.begin(di.split(), Config::default()).unwrap();
        }
        assert_eq!(di.sent().last(), Some(&Sent::Cmd(0xAE)));
    }

    #[test]
    fn independent_sessions() {
        let a = TestSpyInterface::new();
        let b = TestSpyInterface::new();
        let mut left = Session::new();
        let mut right = Session::new();
        left.begin(a.split(), Config::default()).unwrap();
        right
            .begin(b.split(), Config::preset(DisplaySize::Size96x16))
            .unwrap();
        left.display_mut().unwrap().draw_pixel(1, 1, Color::On);
        assert_eq!(right.display().unwrap().get_pixel(1, 1), Color::Off);
        assert_eq!(right.display().unwrap().width(), 96);
    }

    #[test]
    fn over_i2c() {
        let bus = FakeBus::new();
        let mut session = Session::new();
        let iface = I2cInterface::new(bus.split(), 0x3D).unwrap();
        session
            .begin(iface, Config::preset(DisplaySize::Size96x16))
            .unwrap();
        session.display_mut().unwrap().flush().unwrap();

        let writes = bus.writes();
        assert!(writes.iter().all(|(addr, _)| *addr == 0x3D));
        let (_, frame) = writes.last().unwrap();
        assert_eq!(frame.len(), 1 + 96 * 2);
        assert_eq!(frame[0], 0x40);
        assert!(writes[..writes.len() - 1]
            .iter()
            .all(|(_, w)| w.len() == 2 && w[0] == 0x00));

        let iface = session.end().unwrap();
        assert_eq!(iface.address(), 0x3D);
        assert_eq!(bus.writes().last().unwrap().1, vec![0x00, 0xAE]);
    }
}
