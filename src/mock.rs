//! Mock collaborators for testing.

use crate::als::{ChannelSample, ChannelSource};
use crate::backlight::{BacklightDevice, Intensity};
use crate::error::{DeviceError, SmcError};
use std::sync::Mutex;

/// A mock light sensor channel source.
///
/// This allows testing [`AlsValue`](crate::AlsValue) without an actual
/// sensor. The sample and availability can be changed between reads.
///
/// # Example
///
/// ```
/// use asus_smc_keys::{ChannelSample, ChannelSource, MockChannelSource};
///
/// let source = MockChannelSource::new(ChannelSample { chan0: 1, chan1: 2, high_gain: true });
/// assert_eq!(source.sample().unwrap().chan1, 2);
///
/// source.set_available(false);
/// assert!(source.sample().is_err());
/// ```
pub struct MockChannelSource {
    state: Mutex<SourceState>,
}

struct SourceState {
    sample: ChannelSample,
    available: bool,
    count: usize,
}

impl MockChannelSource {
    /// Create a source that returns `sample`.
    pub fn new(sample: ChannelSample) -> Self {
        Self {
            state: Mutex::new(SourceState {
                sample,
                available: true,
                count: 0,
            }),
        }
    }

    /// Replace the sample returned from now on.
    pub fn set_sample(&self, sample: ChannelSample) {
        self.state.lock().unwrap().sample = sample;
    }

    /// Make the sensor appear present or absent.
    pub fn set_available(&self, available: bool) {
        self.state.lock().unwrap().available = available;
    }

    /// How many times the source was sampled successfully.
    pub fn sample_count(&self) -> usize {
        self.state.lock().unwrap().count
    }
}

impl Default for MockChannelSource {
    fn default() -> Self {
        Self::new(ChannelSample {
            chan0: 0,
            chan1: 0,
            high_gain: true,
        })
    }
}

impl ChannelSource for MockChannelSource {
    fn sample(&self) -> Result<ChannelSample, SmcError> {
        let mut state = self.state.lock().unwrap();
        if !state.available {
            return Err(SmcError::SensorUnavailable);
        }
        state.count += 1;
        Ok(state.sample)
    }
}

/// A mock keyboard backlight device.
///
/// Records every intensity it accepts and can be told to fail or to behave
/// as if it was detached.
///
/// # Example
///
/// ```
/// use asus_smc_keys::{BacklightDevice, Intensity, MockBacklightDevice};
///
/// let device = MockBacklightDevice::new();
/// device.set_intensity(Intensity::MAX).unwrap();
/// assert_eq!(device.applied(), vec![Intensity::MAX]);
/// ```
#[derive(Default)]
pub struct MockBacklightDevice {
    state: Mutex<DeviceState>,
}

#[derive(Default)]
struct DeviceState {
    applied: Vec<Intensity>,
    failing: bool,
    detached: bool,
}

impl MockBacklightDevice {
    /// Create a device that accepts every intensity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// Make subsequent calls report the device as gone (or present again).
    pub fn set_detached(&self, detached: bool) {
        self.state.lock().unwrap().detached = detached;
    }

    /// Every intensity accepted so far, oldest first.
    pub fn applied(&self) -> Vec<Intensity> {
        self.state.lock().unwrap().applied.clone()
    }

    /// The most recently accepted intensity.
    pub fn current(&self) -> Option<Intensity> {
        self.state.lock().unwrap().applied.last().copied()
    }
}

impl BacklightDevice for MockBacklightDevice {
    fn set_intensity(&self, intensity: Intensity) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if state.detached {
            return Err(DeviceError::NotAvailable);
        }
        if state.failing {
            return Err(DeviceError::MethodFailed {
                method: "SKBV",
                status: 1,
            });
        }
        state.applied.push(intensity);
        Ok(())
    }
}
