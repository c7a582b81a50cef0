//! Key identities and host status codes.

use crate::error::SmcError;
use std::fmt;

/// A four-character SMC key or key type code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SmcKey([u8; 4]);

impl SmcKey {
    /// Ambient light sensor force bits.
    pub const ALSF: Self = Self(*b"ALSF");
    /// Ambient light sensor value for sensor 0.
    pub const ALV0: Self = Self(*b"ALV0");
    /// Keyboard backlight brightness.
    pub const LKSB: Self = Self(*b"LKSB");
    /// Keyboard backlight status.
    pub const LKSS: Self = Self(*b"LKSS");

    /// Create a key from its four-character code.
    pub const fn new(code: [u8; 4]) -> Self {
        Self(code)
    }

    /// The raw code bytes.
    pub const fn code(&self) -> [u8; 4] {
        self.0
    }

    /// The key packed big-endian into a `u32`, as the SMC protocol carries it.
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl fmt::Display for SmcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SmcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SmcKey({})", self)
    }
}

/// Key data type codes.
pub mod types {
    use super::SmcKey;

    /// Raw unsigned 8-bit value.
    pub const UI8: SmcKey = SmcKey::new(*b"ui8 ");
    /// Ambient light sensor value structure.
    pub const ALV: SmcKey = SmcKey::new(*b"{alv");
    /// Keyboard backlight brightness structure.
    pub const LKB: SmcKey = SmcKey::new(*b"{lkb");
    /// Keyboard backlight status structure.
    pub const LKS: SmcKey = SmcKey::new(*b"{lks");
}

/// Status codes returned to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SmcResult {
    /// The access completed.
    Success = 0x00,
    /// Generic failure.
    Error = 0x01,
    /// No such key.
    KeyNotFound = 0x84,
    /// The key cannot be written.
    KeyNotWritable = 0x86,
    /// The buffer size does not match the key size.
    KeySizeMismatch = 0x87,
    /// The data was rejected.
    BadArgument = 0x89,
    /// The backing device failed.
    DeviceAccessError = 0xC7,
}

impl SmcResult {
    /// The numeric status code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<&SmcError> for SmcResult {
    fn from(err: &SmcError) -> Self {
        match err {
            SmcError::SensorUnavailable => SmcResult::Error,
            SmcError::Unsupported { .. } => SmcResult::KeyNotWritable,
            SmcError::OutOfRangeIntensity { .. } => SmcResult::BadArgument,
            SmcError::ReservedBits { .. } => SmcResult::BadArgument,
            SmcError::Device(_) => SmcResult::DeviceAccessError,
            SmcError::SizeMismatch { .. } => SmcResult::KeySizeMismatch,
            SmcError::KeyNotFound(_) => SmcResult::KeyNotFound,
        }
    }
}

impl<T> From<Result<T, SmcError>> for SmcResult {
    fn from(result: Result<T, SmcError>) -> Self {
        match result {
            Ok(_) => SmcResult::Success,
            Err(ref e) => SmcResult::from(e),
        }
    }
}
