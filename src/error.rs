//! Error type shared by every fallible driver operation.

/// Errors reported by the driver. Pixel-level drawing never fails: coordinates outside the
/// display are dropped silently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An operation was attempted on a session with no active display.
    #[error("display not initialized")]
    NotInitialized,

    /// Opening the bus, binding the peripheral address, or a bus transfer failed. A short write
    /// is reported here as well.
    #[error("bus I/O error: {0}")]
    Io(String),

    /// A parameter was outside the range the controller or driver accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
