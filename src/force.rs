//! Ambient light sensor force bits.
//!
//! Each set bit marks a sensor variable that has been overridden by the host
//! and must not be refreshed from hardware until the bit is cleared again.

use crate::error::SmcError;
use crate::keys::{SmcKey, types};
use crate::value::{SmcValue, check_size};
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Bitfield wrapper around the force mask byte.
///
/// Bits 5-7 are reserved and must be zero.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ForceBits(u8);

impl ForceBits {
    /// Protects the sensor scale.
    pub const FORCE_SCALE: u8 = 0x01;
    /// Protects both raw channel readings.
    pub const FORCE_CHANNELS: u8 = 0x02;
    /// Protects the room lux value.
    pub const FORCE_LUX: u8 = 0x04;
    /// Protects the gain flag.
    pub const FORCE_HIGH_GAIN: u8 = 0x08;
    /// Protects the per-sensor temperatures.
    pub const FORCE_TEMPERATURE: u8 = 0x10;

    /// Mask for all defined bits.
    pub const KNOWN_MASK: u8 = 0x1f;

    /// No fields forced.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create from a raw byte, rejecting reserved bits.
    pub fn new(raw: u8) -> Result<Self, SmcError> {
        if raw & !Self::KNOWN_MASK != 0 {
            return Err(SmcError::ReservedBits {
                bits: raw & !Self::KNOWN_MASK,
            });
        }
        Ok(Self(raw))
    }

    /// Create from a raw byte. Reserved bits are masked off.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & Self::KNOWN_MASK)
    }

    /// The raw byte.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit in `flag` is set.
    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    /// Return a copy with `flag` set.
    pub const fn with(self, flag: u8) -> Self {
        Self::from_raw(self.0 | flag)
    }

    /// Return a copy with `flag` cleared.
    pub const fn without(self, flag: u8) -> Self {
        Self(self.0 & !flag)
    }
}

impl fmt::Debug for ForceBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u8, &str); 5] = [
            (ForceBits::FORCE_SCALE, "SCALE"),
            (ForceBits::FORCE_CHANNELS, "CHANNELS"),
            (ForceBits::FORCE_LUX, "LUX"),
            (ForceBits::FORCE_HIGH_GAIN, "HIGH_GAIN"),
            (ForceBits::FORCE_TEMPERATURE, "TEMPERATURE"),
        ];
        write!(f, "ForceBits(")?;
        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        write!(f, ")")
    }
}

/// ALS fields whose refresh can be suppressed by a force bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlsField {
    /// Sensor scale (not part of the ALS value layout).
    Scale,
    /// `chan0` and `chan1`.
    Channels,
    /// `room_lux`.
    Lux,
    /// `high_gain`.
    HighGain,
    /// Per-sensor temperatures (not part of the ALS value layout).
    Temperature,
}

impl AlsField {
    /// The force bit guarding this field.
    pub const fn force_bit(self) -> u8 {
        match self {
            AlsField::Scale => ForceBits::FORCE_SCALE,
            AlsField::Channels => ForceBits::FORCE_CHANNELS,
            AlsField::Lux => ForceBits::FORCE_LUX,
            AlsField::HighGain => ForceBits::FORCE_HIGH_GAIN,
            AlsField::Temperature => ForceBits::FORCE_TEMPERATURE,
        }
    }
}

/// Whether `field` may be refreshed from hardware under `mask`.
pub const fn refresh_allowed(mask: ForceBits, field: AlsField) -> bool {
    !mask.contains(field.force_bit())
}

/// Shared storage for the force mask.
///
/// The owner updates it through [`force`](Self::force),
/// [`release`](Self::release) or the `ALSF` key; ALS values only ever
/// call [`bits`](Self::bits).
#[derive(Debug, Default)]
pub struct AlsForceMask {
    bits: AtomicU8,
}

impl AlsForceMask {
    /// Size of the `ALSF` value in bytes.
    pub const SIZE: usize = 1;

    /// Create storage holding `initial`.
    pub const fn new(initial: ForceBits) -> Self {
        Self {
            bits: AtomicU8::new(initial.bits()),
        }
    }

    /// The current mask byte.
    pub fn bits(&self) -> u8 {
        self.bits.load(Ordering::Acquire)
    }

    /// The current mask.
    pub fn get(&self) -> ForceBits {
        ForceBits::from_raw(self.bits())
    }

    /// Replace the whole mask.
    pub fn set(&self, mask: ForceBits) {
        self.bits.store(mask.bits(), Ordering::Release);
        debug!("force mask set to {:?}", mask);
    }

    /// Set `flag`, pinning the fields it guards.
    ///
    /// Returns the mask produced by this update.
    pub fn force(&self, flag: u8) -> ForceBits {
        let prev = self.bits.fetch_or(flag & ForceBits::KNOWN_MASK, Ordering::AcqRel);
        let prev = ForceBits::from_raw(prev);
        let next = prev.with(flag);
        debug!("force mask {:?} -> {:?}", prev, next);
        next
    }

    /// Clear `flag`, letting the fields it guards refresh again.
    ///
    /// Returns the mask produced by this update.
    pub fn release(&self, flag: u8) -> ForceBits {
        let prev = ForceBits::from_raw(self.bits.fetch_and(!flag, Ordering::AcqRel));
        let next = prev.without(flag);
        debug!("force mask {:?} -> {:?}", prev, next);
        next
    }
}

/// The `ALSF` key is served through a shared reference, so the same storage
/// can be bound to ALS values at the same time.
impl SmcValue for &AlsForceMask {
    fn key(&self) -> SmcKey {
        SmcKey::ALSF
    }

    fn key_type(&self) -> SmcKey {
        types::UI8
    }

    fn size(&self) -> usize {
        AlsForceMask::SIZE
    }

    fn read(&mut self, out: &mut [u8]) -> Result<(), SmcError> {
        check_size(&*self, out.len())?;
        out[0] = self.bits();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), SmcError> {
        check_size(&*self, data.len())?;
        let mask = ForceBits::new(data[0])?;
        self.set(mask);
        Ok(())
    }
}
