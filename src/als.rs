//! Ambient light sensor value (`ALV0`).

use crate::error::SmcError;
use crate::force::{AlsField, AlsForceMask, ForceBits, refresh_allowed};
use crate::keys::{SmcKey, types};
use crate::value::{SmcValue, check_size};
use bytemuck::{Pod, Zeroable};
use log::{trace, warn};
use std::sync::atomic::{AtomicU32, Ordering};

/// Size of the ALS value on the wire.
pub const ALS_VALUE_SIZE: usize = 10;

/// Raw channel data from the light sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSample {
    /// I2C channel 0 data or analog (ADC) data.
    pub chan0: u16,
    /// I2C channel 1 data.
    pub chan1: u16,
    /// Whether the channels were sampled in high-gain mode.
    pub high_gain: bool,
}

/// Source of raw light sensor channel data.
pub trait ChannelSource: Send {
    /// Sample both channels and the gain mode.
    ///
    /// Return [`SmcError::SensorUnavailable`] if the sensor cannot be read.
    fn sample(&self) -> Result<ChannelSample, SmcError>;
}

impl<T: ChannelSource + Sync + ?Sized> ChannelSource for &T {
    fn sample(&self) -> Result<ChannelSample, SmcError> {
        (**self).sample()
    }
}

/// Latest ambient light information from one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlsReading {
    /// Whether the data in this reading is valid.
    pub valid: bool,
    /// If true, `chan0`/`chan1` are high-gain readings, otherwise low-gain.
    pub high_gain: bool,
    /// Channel 0 intensity.
    pub chan0: u16,
    /// Channel 1 intensity.
    pub chan1: u16,
    /// Room illumination in lux, Q18.14.
    pub room_lux: u32,
}

impl Default for AlsReading {
    fn default() -> Self {
        Self {
            valid: false,
            high_gain: true,
            chan0: 0,
            chan1: 0,
            room_lux: 0,
        }
    }
}

impl AlsReading {
    /// Serialize into the wire layout.
    pub fn to_bytes(&self) -> [u8; ALS_VALUE_SIZE] {
        let raw = RawAlsValue::from(*self);
        let mut out = [0u8; ALS_VALUE_SIZE];
        out.copy_from_slice(bytemuck::bytes_of(&raw));
        out
    }

    /// Parse the wire layout.
    pub fn from_bytes(bytes: &[u8; ALS_VALUE_SIZE]) -> Self {
        bytemuck::pod_read_unaligned::<RawAlsValue>(bytes).into()
    }
}

// valid(1) high_gain(1) chan0(2) chan1(2) room_lux(4), little-endian
#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C, packed)]
struct RawAlsValue {
    valid: u8,
    high_gain: u8,
    chan0: u16,
    chan1: u16,
    room_lux: u32,
}

const _: () = assert!(std::mem::size_of::<RawAlsValue>() == ALS_VALUE_SIZE);

impl From<AlsReading> for RawAlsValue {
    fn from(reading: AlsReading) -> Self {
        Self {
            valid: u8::from(reading.valid),
            high_gain: u8::from(reading.high_gain),
            chan0: reading.chan0.to_le(),
            chan1: reading.chan1.to_le(),
            room_lux: reading.room_lux.to_le(),
        }
    }
}

impl From<RawAlsValue> for AlsReading {
    fn from(raw: RawAlsValue) -> Self {
        Self {
            valid: raw.valid != 0,
            high_gain: raw.high_gain != 0,
            chan0: u16::from_le(raw.chan0),
            chan1: u16::from_le(raw.chan1),
            room_lux: u32::from_le(raw.room_lux),
        }
    }
}

/// The `ALV0` key value.
///
/// Bound at construction to a shared lux cell and force mask, both owned
/// elsewhere and required to outlive the value. Each read refreshes the
/// fields whose force bit is clear and keeps the rest.
pub struct AlsValue<'a, S> {
    current_lux: &'a AtomicU32,
    force: &'a AlsForceMask,
    source: S,
    reading: AlsReading,
}

impl<'a, S: ChannelSource> AlsValue<'a, S> {
    /// Create a value with a default reading.
    pub fn new(current_lux: &'a AtomicU32, force: &'a AlsForceMask, source: S) -> Self {
        Self::with_reading(current_lux, force, source, AlsReading::default())
    }

    /// Create a value seeded with `reading`, which forced fields keep until released.
    pub fn with_reading(
        current_lux: &'a AtomicU32,
        force: &'a AlsForceMask,
        source: S,
        reading: AlsReading,
    ) -> Self {
        Self {
            current_lux,
            force,
            source,
            reading,
        }
    }

    /// The reading as of the last refresh.
    pub fn reading(&self) -> AlsReading {
        self.reading
    }

    /// Refresh unforced fields and return the result.
    ///
    /// The lux cell is read with a single atomic load. Channel data is sampled
    /// separately, so lux and channels may come from slightly different instants.
    pub fn refresh(&mut self) -> AlsReading {
        let mask = ForceBits::from_raw(self.force.bits());

        if refresh_allowed(mask, AlsField::Lux) {
            self.reading.room_lux = self.current_lux.load(Ordering::Acquire);
        }

        let channels = refresh_allowed(mask, AlsField::Channels);
        let gain = refresh_allowed(mask, AlsField::HighGain);
        if !channels && !gain {
            self.reading.valid = true;
            return self.reading;
        }

        match self.source.sample() {
            Ok(sample) => {
                if channels {
                    self.reading.chan0 = sample.chan0;
                    self.reading.chan1 = sample.chan1;
                }
                if gain {
                    self.reading.high_gain = sample.high_gain;
                }
                self.reading.valid = true;
            }
            Err(e) => {
                warn!("ALS channels unavailable, marking reading invalid: {}", e);
                self.reading.valid = false;
            }
        }

        trace!("ALS refresh with {:?}: {:?}", mask, self.reading);
        self.reading
    }
}

impl<S: ChannelSource> SmcValue for AlsValue<'_, S> {
    fn key(&self) -> SmcKey {
        SmcKey::ALV0
    }

    fn key_type(&self) -> SmcKey {
        types::ALV
    }

    fn size(&self) -> usize {
        ALS_VALUE_SIZE
    }

    fn read(&mut self, out: &mut [u8]) -> Result<(), SmcError> {
        check_size(&*self, out.len())?;
        let reading = self.refresh();
        out.copy_from_slice(&reading.to_bytes());
        Ok(())
    }
}
