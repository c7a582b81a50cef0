//! Error types for SMC key values.

use crate::keys::SmcKey;

/// Errors reported by a platform device handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The device method returned a non-zero status.
    #[error("Device method {method} failed (status: {status:#x})")]
    MethodFailed {
        /// The method name that was evaluated.
        method: &'static str,
        /// The status returned by the device.
        status: u32,
    },

    /// The device is not present or was detached.
    #[error("Device not available")]
    NotAvailable,
}

/// Errors that can occur when reading or writing an SMC key value.
#[derive(Debug, thiserror::Error)]
pub enum SmcError {
    /// The underlying sensor could not be sampled.
    #[error("Sensor source unavailable")]
    SensorUnavailable,

    /// The key does not support the requested access.
    #[error("Operation not supported for key {key}")]
    Unsupported {
        /// The key that was addressed.
        key: SmcKey,
    },

    /// A backlight intensity fell outside the 12-bit range.
    #[error("Backlight intensity {raw:#x} out of range (expected 0x000-0xfff)")]
    OutOfRangeIntensity {
        /// The raw value before masking.
        raw: u16,
    },

    /// The platform device rejected the request.
    #[error("Device invocation failed: {0}")]
    Device(#[from] DeviceError),

    /// A buffer did not match the declared key size.
    #[error("Size mismatch for key {key} (expected {expected} bytes, got {actual})")]
    SizeMismatch {
        /// The key that was addressed.
        key: SmcKey,
        /// Declared size of the key value.
        expected: usize,
        /// Size of the buffer provided.
        actual: usize,
    },

    /// A force mask write set reserved bits.
    #[error("Reserved force bits set: {bits:#04x}")]
    ReservedBits {
        /// The offending reserved bits.
        bits: u8,
    },

    /// No value is registered under the key.
    #[error("Key {0} not found")]
    KeyNotFound(SmcKey),
}
