//! The addressable value trait.

use crate::error::SmcError;
use crate::keys::SmcKey;

/// Trait for values addressable through an SMC key.
///
/// Buffers passed to [`read`](SmcValue::read) and [`write`](SmcValue::write)
/// must be exactly [`size`](SmcValue::size) bytes long.
pub trait SmcValue: Send {
    /// The key this value is registered under.
    fn key(&self) -> SmcKey;

    /// The key data type code.
    fn key_type(&self) -> SmcKey;

    /// Size of the value in bytes.
    fn size(&self) -> usize;

    /// Fill `out` with the current value.
    fn read(&mut self, out: &mut [u8]) -> Result<(), SmcError>;

    /// Accept a new value from the host.
    ///
    /// The default implementation rejects all writes without touching state.
    fn write(&mut self, data: &[u8]) -> Result<(), SmcError> {
        let _ = data;
        Err(SmcError::Unsupported { key: self.key() })
    }
}

/// Check that `len` matches the declared size of `value`.
pub(crate) fn check_size(value: &dyn SmcValue, len: usize) -> Result<(), SmcError> {
    if len != value.size() {
        return Err(SmcError::SizeMismatch {
            key: value.key(),
            expected: value.size(),
            actual: len,
        });
    }
    Ok(())
}
