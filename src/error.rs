//! Error types for xautorotate
//!
//! Everything below the run loop reports through this one enum; the loop
//! logs and moves on to the next sensor event.

use x11rb::errors::{ConnectError, ConnectionError, ReplyError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to open X display: {0}")]
    Connect(#[from] ConnectError),

    #[error("X connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("X server does not support the {0} extension")]
    MissingExtension(&'static str),

    #[error("{0} atom not found, this server is too old")]
    PropertyMissing(&'static str),

    #[error("Unexpected property type {found_type} with format {format}")]
    PropertyTypeMismatch { found_type: u32, format: u8 },

    #[error("Unexpected property size: {items} items, {bytes_after} bytes left over")]
    PropertySizeMismatch { items: u32, bytes_after: u32 },

    #[error("Writing the transformation matrix failed: {0}")]
    WriteFailed(#[source] ReplyError),

    #[error("Invalid RandR rotation bits {0:#06x}")]
    InvalidRotation(u16),

    #[error("Unrecognized orientation {0:?}, expected normal, left-up, bottom-up or right-up")]
    UnrecognizedOrientation(String),

    #[error("Invalid device pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Underlying I/O error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
