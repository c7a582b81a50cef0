//! Keyboard backlight values (`LKSB`, `LKSS`).

use crate::codec::{INTENSITY_MAX, backlight_has_stray_bits, decode_backlight, encode_backlight};
use crate::error::{DeviceError, SmcError};
use crate::keys::{SmcKey, types};
use crate::value::{SmcValue, check_size};
use log::{debug, warn};

/// A 12-bit keyboard backlight intensity (0x000-0xfff).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Intensity(u16);

impl Intensity {
    /// Backlight off.
    pub const MIN: Self = Self(0);
    /// Full brightness.
    pub const MAX: Self = Self(INTENSITY_MAX);

    /// Create an intensity.
    ///
    /// # Errors
    /// Returns an error if `value` > 0xfff.
    pub fn new(value: u16) -> Result<Self, SmcError> {
        if value > INTENSITY_MAX {
            return Err(SmcError::OutOfRangeIntensity { raw: value });
        }
        Ok(Self(value))
    }

    /// Create an intensity, dropping bits above the 12-bit range.
    pub const fn masked(value: u16) -> Self {
        Self(value & INTENSITY_MAX)
    }

    /// The raw 12-bit value.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Encode as the `lkb` byte pair.
    pub fn to_lkb(self) -> [u8; 2] {
        let (val1, val2) = encode_backlight(self.0);
        [val1, val2]
    }

    /// Decode an `lkb` byte pair, ignoring the unused low nibble of `val2`.
    pub fn from_lkb(bytes: [u8; 2]) -> Self {
        Self(decode_backlight(bytes[0], bytes[1]))
    }
}

/// Trait for platform devices that drive the keyboard backlight.
///
/// Implementations serialize their own access; the call is synchronous and
/// is never retried by the caller.
pub trait BacklightDevice: Send + Sync {
    /// Apply a new backlight intensity.
    fn set_intensity(&self, intensity: Intensity) -> Result<(), DeviceError>;
}

impl<T: BacklightDevice + ?Sized> BacklightDevice for &T {
    fn set_intensity(&self, intensity: Intensity) -> Result<(), DeviceError> {
        (**self).set_intensity(intensity)
    }
}

/// How `lkb` writes with stray bits in `val2` are handled.
///
/// Either way the write reports [`SmcError::OutOfRangeIntensity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Drop the stray bits, apply the remaining 12-bit value, then report
    /// the malformed input.
    #[default]
    Mask,
    /// Fail the write without touching the device.
    Reject,
}

/// The `LKSS` key value. Both bytes are opaque and stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LksValue {
    bytes: [u8; 2],
}

impl LksValue {
    /// Size of the value in bytes.
    pub const SIZE: usize = 2;
    /// Bytes reported until the host writes new ones.
    pub const DEFAULT_BYTES: [u8; 2] = [0, 1];

    /// Create with the default bytes.
    pub fn new() -> Self {
        Self::with_bytes(Self::DEFAULT_BYTES)
    }

    /// Create with custom bytes.
    pub fn with_bytes(bytes: [u8; 2]) -> Self {
        Self { bytes }
    }

    /// The stored bytes.
    pub fn bytes(&self) -> [u8; 2] {
        self.bytes
    }
}

impl Default for LksValue {
    fn default() -> Self {
        Self::new()
    }
}

impl SmcValue for LksValue {
    fn key(&self) -> SmcKey {
        SmcKey::LKSS
    }

    fn key_type(&self) -> SmcKey {
        types::LKS
    }

    fn size(&self) -> usize {
        Self::SIZE
    }

    fn read(&mut self, out: &mut [u8]) -> Result<(), SmcError> {
        check_size(&*self, out.len())?;
        out.copy_from_slice(&self.bytes);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), SmcError> {
        check_size(&*self, data.len())?;
        self.bytes.copy_from_slice(data);
        Ok(())
    }
}

/// The `LKSB` key value.
///
/// A write decodes the 12-bit intensity and applies it to the bound device.
/// The stored bytes only change once the device accepts the new intensity.
pub struct LkbValue<D> {
    device: D,
    policy: MalformedPolicy,
    bytes: [u8; 2],
    committed: Option<Intensity>,
}

impl<D: BacklightDevice> LkbValue<D> {
    /// Size of the value in bytes.
    pub const SIZE: usize = 2;
    /// Bytes reported until the first successful write.
    pub const DEFAULT_BYTES: [u8; 2] = [0, 1];

    /// Create a value bound to `device`, masking malformed input.
    pub fn new(device: D) -> Self {
        Self::with_policy(device, MalformedPolicy::default())
    }

    /// Create a value bound to `device` with an explicit malformed-input policy.
    pub fn with_policy(device: D, policy: MalformedPolicy) -> Self {
        Self {
            device,
            policy,
            bytes: Self::DEFAULT_BYTES,
            committed: None,
        }
    }

    /// The last intensity the device accepted, if any.
    pub fn committed(&self) -> Option<Intensity> {
        self.committed
    }

    /// The bytes reported on read.
    pub fn bytes(&self) -> [u8; 2] {
        self.bytes
    }

    /// Decode `(val1, val2)` and apply it to the device.
    ///
    /// Stray bits in `val2` fail the write with `OutOfRangeIntensity`; under
    /// [`MalformedPolicy::Mask`] the masked intensity is applied first.
    fn apply(&mut self, val1: u8, val2: u8) -> Result<Intensity, SmcError> {
        let malformed = if backlight_has_stray_bits(val2) {
            Some(u16::from_be_bytes([val1, val2]))
        } else {
            None
        };
        if let Some(raw) = malformed {
            if self.policy == MalformedPolicy::Reject {
                warn!("rejecting malformed backlight value {:#06x}", raw);
                return Err(SmcError::OutOfRangeIntensity { raw });
            }
            warn!("masking stray bits in backlight value {:#06x}", raw);
        }

        let intensity = Intensity::from_lkb([val1, val2]);
        self.commit(intensity)?;

        match malformed {
            Some(raw) => Err(SmcError::OutOfRangeIntensity { raw }),
            None => Ok(intensity),
        }
    }

    fn commit(&mut self, intensity: Intensity) -> Result<(), SmcError> {
        if let Err(e) = self.device.set_intensity(intensity) {
            warn!("failed to set backlight to {:#05x}: {}", intensity.get(), e);
            return Err(e.into());
        }

        debug!("backlight set to {:#05x}", intensity.get());
        self.bytes = intensity.to_lkb();
        self.committed = Some(intensity);
        Ok(())
    }
}

impl<D: BacklightDevice> SmcValue for LkbValue<D> {
    fn key(&self) -> SmcKey {
        SmcKey::LKSB
    }

    fn key_type(&self) -> SmcKey {
        types::LKB
    }

    fn size(&self) -> usize {
        Self::SIZE
    }

    fn read(&mut self, out: &mut [u8]) -> Result<(), SmcError> {
        check_size(&*self, out.len())?;
        out.copy_from_slice(&self.bytes);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), SmcError> {
        check_size(&*self, data.len())?;
        self.apply(data[0], data[1])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBacklightDevice;

    #[test]
    fn test_intensity_range() {
        assert_eq!(Intensity::new(0xfff).unwrap(), Intensity::MAX);
        assert!(matches!(
            Intensity::new(0x1000),
            Err(SmcError::OutOfRangeIntensity { raw: 0x1000 })
        ));
        assert_eq!(Intensity::masked(0xffff), Intensity::MAX);
    }

    #[test]
    fn test_intensity_lkb_bytes() {
        let intensity = Intensity::new(0x6eb).unwrap();
        assert_eq!(intensity.to_lkb(), [0x6e, 0xb0]);
        assert_eq!(Intensity::from_lkb([0x6e, 0xb0]), intensity);
        assert_eq!(Intensity::from_lkb([0xff, 0xff]), Intensity::MAX);
    }

    #[test]
    fn test_lkb_write_applies_intensity() {
        let device = MockBacklightDevice::new();
        let mut lkb = LkbValue::new(&device);

        lkb.write(&[0x6e, 0xb0]).unwrap();
        assert_eq!(device.applied(), vec![Intensity::new(0x6eb).unwrap()]);
        assert_eq!(lkb.committed(), Some(Intensity::new(0x6eb).unwrap()));

        let mut buf = [0u8; 2];
        lkb.read(&mut buf).unwrap();
        assert_eq!(buf, [0x6e, 0xb0]);
    }

    #[test]
    fn test_lkb_default_bytes() {
        let device = MockBacklightDevice::new();
        let mut lkb = LkbValue::new(&device);

        let mut buf = [0u8; 2];
        lkb.read(&mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x01]);
        assert_eq!(lkb.committed(), None);
        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_lkb_masks_stray_bits() {
        let device = MockBacklightDevice::new();
        let mut lkb = LkbValue::new(&device);

        assert!(matches!(
            lkb.write(&[0xff, 0xff]),
            Err(SmcError::OutOfRangeIntensity { raw: 0xffff })
        ));
        assert_eq!(device.applied(), vec![Intensity::MAX]);
        assert_eq!(lkb.committed(), Some(Intensity::MAX));
        assert_eq!(lkb.bytes(), [0xff, 0xf0]);
    }

    #[test]
    fn test_lkb_rejects_stray_bits() {
        let device = MockBacklightDevice::new();
        let mut lkb = LkbValue::with_policy(&device, MalformedPolicy::Reject);

        assert!(matches!(
            lkb.write(&[0x12, 0x34]),
            Err(SmcError::OutOfRangeIntensity { raw: 0x1234 })
        ));
        assert!(device.applied().is_empty());
        assert_eq!(lkb.bytes(), [0x00, 0x01]);

        lkb.write(&[0x12, 0x30]).unwrap();
        assert_eq!(device.applied(), vec![Intensity::new(0x123).unwrap()]);
    }

    #[test]
    fn test_lkb_device_failure_keeps_state() {
        let device = MockBacklightDevice::new();
        let mut lkb = LkbValue::new(&device);
        lkb.write(&[0x40, 0x00]).unwrap();

        device.set_failing(true);
        let result = lkb.write(&[0x80, 0x00]);
        assert!(matches!(
            result,
            Err(SmcError::Device(DeviceError::MethodFailed { .. }))
        ));
        assert_eq!(lkb.bytes(), [0x40, 0x00]);
        assert_eq!(lkb.committed(), Some(Intensity::new(0x400).unwrap()));
        assert_eq!(device.applied(), vec![Intensity::new(0x400).unwrap()]);
    }

    #[test]
    fn test_lkb_detached_device() {
        let device = MockBacklightDevice::new();
        let mut lkb = LkbValue::new(&device);
        device.set_detached(true);

        assert!(matches!(
            lkb.write(&[0x20, 0x00]),
            Err(SmcError::Device(DeviceError::NotAvailable))
        ));
        assert_eq!(lkb.committed(), None);

        device.set_detached(false);
        lkb.write(&[0x20, 0x00]).unwrap();
        assert_eq!(lkb.committed(), Some(Intensity::new(0x200).unwrap()));
    }

    #[test]
    fn test_lkb_malformed_and_device_failure() {
        let device = MockBacklightDevice::new();
        let mut lkb = LkbValue::new(&device);
        device.set_failing(true);

        assert!(matches!(
            lkb.write(&[0x80, 0x0f]),
            Err(SmcError::Device(DeviceError::MethodFailed { .. }))
        ));
        assert_eq!(lkb.committed(), None);
        assert_eq!(lkb.bytes(), [0x00, 0x01]);
    }

    #[test]
    fn test_lkb_size_mismatch() {
        let device = MockBacklightDevice::new();
        let mut lkb = LkbValue::new(&device);

        assert!(matches!(
            lkb.write(&[0x10]),
            Err(SmcError::SizeMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_lks_passthrough() {
        let mut lks = LksValue::new();
        let mut buf = [0u8; 2];
        lks.read(&mut buf).unwrap();
        assert_eq!(buf, [0, 1]);

        lks.write(&[0xab, 0xcd]).unwrap();
        lks.read(&mut buf).unwrap();
        assert_eq!(buf, [0xab, 0xcd]);
        assert_eq!(LksValue::with_bytes([7, 8]).bytes(), [7, 8]);
    }
}
