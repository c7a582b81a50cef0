//! Key-addressed table of values.

use crate::error::SmcError;
use crate::keys::{SmcKey, SmcResult};
use crate::value::SmcValue;
use log::{trace, warn};
use std::collections::BTreeMap;

/// Values addressed by their SMC key.
///
/// Each access is checked against the declared key size and every failure is
/// reported as an [`SmcResult`] status rather than an error.
#[derive(Default)]
pub struct KeyStore<'a> {
    values: BTreeMap<SmcKey, Box<dyn SmcValue + 'a>>,
}

impl<'a> KeyStore<'a> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under its own key, returning any value it replaced.
    pub fn insert<V: SmcValue + 'a>(&mut self, value: V) -> Option<Box<dyn SmcValue + 'a>> {
        self.values.insert(value.key(), Box::new(value))
    }

    /// Registered keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = SmcKey> + '_ {
        self.values.keys().copied()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Size and type of `key`.
    pub fn info(&self, key: SmcKey) -> Option<(usize, SmcKey)> {
        self.values.get(&key).map(|v| (v.size(), v.key_type()))
    }

    /// Read `key` into `out`.
    pub fn read(&mut self, key: SmcKey, out: &mut [u8]) -> SmcResult {
        let result = self.try_read(key, out);
        report("read", key, result)
    }

    /// Write `data` to `key`.
    pub fn write(&mut self, key: SmcKey, data: &[u8]) -> SmcResult {
        let result = self.try_write(key, data);
        report("write", key, result)
    }

    /// Read `key` into `out`, returning the underlying error on failure.
    pub fn try_read(&mut self, key: SmcKey, out: &mut [u8]) -> Result<(), SmcError> {
        let value = self.values.get_mut(&key).ok_or(SmcError::KeyNotFound(key))?;
        value.read(out)
    }

    /// Write `data` to `key`, returning the underlying error on failure.
    pub fn try_write(&mut self, key: SmcKey, data: &[u8]) -> Result<(), SmcError> {
        let value = self.values.get_mut(&key).ok_or(SmcError::KeyNotFound(key))?;
        value.write(data)
    }
}

fn report(op: &str, key: SmcKey, result: Result<(), SmcError>) -> SmcResult {
    match &result {
        Ok(()) => trace!("{} {} ok", op, key),
        Err(e) => warn!("{} {} failed: {}", op, key, e),
    }
    SmcResult::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::als::{ALS_VALUE_SIZE, AlsReading, AlsValue, ChannelSample};
    use crate::backlight::{Intensity, LkbValue, LksValue, MalformedPolicy};
    use crate::force::{AlsForceMask, ForceBits};
    use crate::mock::{MockBacklightDevice, MockChannelSource};
    use std::sync::atomic::AtomicU32;

    #[test]
    fn test_store_addresses_all_keys() {
        let lux = AtomicU32::new(0x0001_0000);
        let force = AlsForceMask::default();
        let source = MockChannelSource::new(ChannelSample {
            chan0: 100,
            chan1: 200,
            high_gain: false,
        });
        let device = MockBacklightDevice::new();

        let mut store = KeyStore::new();
        store.insert(&force);
        store.insert(AlsValue::new(&lux, &force, &source));
        store.insert(LkbValue::new(&device));
        store.insert(LksValue::new());

        let keys: Vec<_> = store.keys().collect();
        assert_eq!(
            keys,
            vec![SmcKey::ALSF, SmcKey::ALV0, SmcKey::LKSB, SmcKey::LKSS]
        );
        assert_eq!(
            store.info(SmcKey::ALV0),
            Some((ALS_VALUE_SIZE, crate::keys::types::ALV))
        );

        let mut buf = [0u8; ALS_VALUE_SIZE];
        assert_eq!(store.read(SmcKey::ALV0, &mut buf), SmcResult::Success);
        let reading = AlsReading::from_bytes(&buf);
        assert!(reading.valid);
        assert_eq!(reading.room_lux, 0x0001_0000);

        assert_eq!(store.write(SmcKey::LKSB, &[0x6e, 0xb0]), SmcResult::Success);
        assert_eq!(device.current(), Some(Intensity::new(0x6eb).unwrap()));

        assert_eq!(
            store.write(SmcKey::ALSF, &[ForceBits::FORCE_LUX]),
            SmcResult::Success
        );
        assert_eq!(force.bits(), ForceBits::FORCE_LUX);
    }

    #[test]
    fn test_store_status_codes() {
        let lux = AtomicU32::new(0);
        let force = AlsForceMask::default();
        let source = MockChannelSource::default();
        let device = MockBacklightDevice::new();

        let mut store = KeyStore::new();
        store.insert(&force);
        store.insert(AlsValue::new(&lux, &force, &source));
        store.insert(LkbValue::new(&device));

        assert_eq!(
            store.write(SmcKey::ALV0, &[0u8; ALS_VALUE_SIZE]),
            SmcResult::KeyNotWritable
        );
        assert_eq!(store.read(SmcKey::LKSS, &mut [0u8; 2]), SmcResult::KeyNotFound);
        assert_eq!(
            store.read(SmcKey::LKSB, &mut [0u8; 3]),
            SmcResult::KeySizeMismatch
        );
        assert_eq!(store.write(SmcKey::ALSF, &[0x40]), SmcResult::BadArgument);

        device.set_failing(true);
        assert_eq!(
            store.write(SmcKey::LKSB, &[0x10, 0x00]),
            SmcResult::DeviceAccessError
        );

        device.set_failing(false);
        device.set_detached(true);
        assert_eq!(
            store.write(SmcKey::LKSB, &[0x10, 0x00]),
            SmcResult::DeviceAccessError
        );
    }

    #[test]
    fn test_store_reports_malformed_backlight() {
        let device = MockBacklightDevice::new();
        let mut store = KeyStore::new();
        store.insert(LkbValue::new(&device));

        assert_eq!(
            store.write(SmcKey::LKSB, &[0xff, 0xff]),
            SmcResult::BadArgument
        );
        assert_eq!(device.applied(), vec![Intensity::MAX]);

        let mut buf = [0u8; 2];
        assert_eq!(store.read(SmcKey::LKSB, &mut buf), SmcResult::Success);
        assert_eq!(buf, [0xff, 0xf0]);
    }

    #[test]
    fn test_store_rejects_malformed_backlight() {
        let device = MockBacklightDevice::new();
        let mut store = KeyStore::new();
        store.insert(LkbValue::with_policy(&device, MalformedPolicy::Reject));

        assert_eq!(
            store.write(SmcKey::LKSB, &[0xff, 0xff]),
            SmcResult::BadArgument
        );
        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let mut store = KeyStore::new();
        assert!(store.insert(LksValue::new()).is_none());
        assert!(store.insert(LksValue::with_bytes([1, 2])).is_some());
        assert_eq!(store.len(), 1);

        let mut buf = [0u8; 2];
        store.try_read(SmcKey::LKSS, &mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
    }
}
