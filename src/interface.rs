//! The transport seam between the driver and the bus. The SSD1306 accepts two kinds of frames on
//! the two-wire bus: a command frame carrying one controller instruction byte, and a data frame
//! carrying a block of display RAM contents. A leading control byte tells the two apart.

use crate::error::Result;

/// Control byte that marks the following byte as a controller command.
pub const COMMAND_PREFIX: u8 = 0x00;
/// Control byte that marks the rest of the frame as display RAM data.
pub const DATA_PREFIX: u8 = 0x40;

/// Peripheral address when the SA0 strap is pulled low.
pub const DEFAULT_ADDRESS: u8 = 0x3C;
/// Peripheral address when the SA0 strap is pulled high.
pub const ALTERNATE_ADDRESS: u8 = 0x3D;

pub trait DisplayInterface {
    fn send_command(&mut self, cmd: u8) -> Result<()>;
    fn send_data(&mut self, buf: &[u8]) -> Result<()>;
}

pub mod i2c {
    //! The I2C interface frames each command byte and each data block into a single bus write
    //! addressed to the bound peripheral. There is no read path; the driver never reads display
    //! RAM back.

    use core::fmt;

    use log::trace;

    use super::{DisplayInterface, COMMAND_PREFIX, DATA_PREFIX};
    use crate::error::{Error, Result};

    pub struct I2cInterface<I2C> {
        /// The I2C master device the SSD1306 hangs off.
        i2c: I2C,
        /// 7-bit peripheral address of the controller.
        address: u8,
        /// Scratch space for assembling data frames, reused across flushes.
        frame: Vec<u8>,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
        I2C::Error: fmt::Display,
    {
        /// Bind the bus `i2c` to the peripheral at `address`. Only 7-bit addresses are accepted.
        pub fn new(i2c: I2C, address: u8) -> Result<Self> {
            if address > 0x7F {
                return Err(Error::invalid(format!(
                    "I2C address {:#04x} is not a 7-bit address",
                    address
                )));
            }
            Ok(Self {
                i2c,
                address,
                frame: Vec::new(),
            })
        }

        pub fn address(&self) -> u8 {
            self.address
        }

        /// Give back the underlying bus.
        pub fn release(self) -> I2C {
            self.i2c
        }

        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            self.i2c
                .write(self.address, bytes)
                .map_err(|e| Error::Io(e.to_string()))
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
        I2C::Error: fmt::Display,
    {
        fn send_command(&mut self, cmd: u8) -> Result<()> {
            trace!("command {:#04x}", cmd);
            self.write(&[COMMAND_PREFIX, cmd])
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<()> {
            let mut frame = core::mem::take(&mut self.frame);
            frame.clear();
            frame.reserve(buf.len() + 1);
            frame.push(DATA_PREFIX);
            frame.extend_from_slice(buf);
            let res = self.write(&frame);
            self.frame = frame;
            res
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::interface::test_spy::FakeBus;

        #[test]
        fn command_frame() {
            let bus = FakeBus::new();
            let mut iface = I2cInterface::new(bus.split(), 0x3C).unwrap();
            iface.send_command(0xAF).unwrap();
            assert_eq!(bus.writes(), vec![(0x3C, vec![0x00, 0xAF])]);
        }

        #[test]
        fn data_frame() {
            let bus = FakeBus::new();
            let mut iface = I2cInterface::new(bus.split(), 0x3D).unwrap();
            iface.send_data(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
            iface.send_data(&[0x01]).unwrap();
            assert_eq!(
                bus.writes(),
                vec![
                    (0x3D, vec![0x40, 0xDE, 0xAD, 0xBE, 0xEF]),
                    (0x3D, vec![0x40, 0x01]),
                ]
            );
        }

        #[test]
        fn rejects_wide_address() {
            assert!(matches!(
                I2cInterface::new(FakeBus::new(), 0x80),
                Err(Error::InvalidArgument(_))
            ));
        }

        #[test]
        fn bus_failure_is_io_error() {
            let bus = FakeBus::new();
            let mut iface = I2cInterface::new(bus.split(), 0x3C).unwrap();
            bus.fail_after(0);
            let nack = Err(Error::Io("no acknowledge from peripheral".into()));
            assert_eq!(iface.send_command(0xAE), nack);
            assert_eq!(iface.send_data(&[0; 8]), nack);
        }
    }
}

#[cfg(target_os = "linux")]
pub mod linux {
    //! Opening a Linux `i2c-dev` character device. The device node is wrapped in
    //! `linux_embedded_hal::I2cdev`, which binds the peripheral address before each write and
    //! sends every write as a single bus message, so a transfer either completes or fails.

    use std::path::{Path, PathBuf};

    use linux_embedded_hal::I2cdev;
    use log::debug;

    use crate::error::{Error, Result};

    /// Path of the character device for bus number `bus`.
    pub fn bus_path(bus: u8) -> PathBuf {
        PathBuf::from(format!("/dev/i2c-{}", bus))
    }

    /// Open `/dev/i2c-<bus>`.
    pub fn open_bus(bus: u8) -> Result<I2cdev> {
        open_path(bus_path(bus))
    }

    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<I2cdev> {
        let path = path.as_ref();
        let i2c = I2cdev::new(path)
            .map_err(|e| Error::Io(format!("open {}: {}", path.display(), e)))?;
        debug!("opened {}", path.display());
        Ok(i2c)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn bus_path_names_device_node() {
            assert_eq!(bus_path(1), PathBuf::from("/dev/i2c-1"));
            assert_eq!(bus_path(12), PathBuf::from("/dev/i2c-12"));
        }

        #[test]
        fn open_missing_device_is_io_error() {
            let err = open_path("/nonexistent/i2c-99").err().unwrap();
            match err {
                Error::Io(msg) => assert!(msg.starts_with("open /nonexistent/i2c-99: ")),
                other => panic!("unexpected error {:?}", other),
            }
        }
    }
}
