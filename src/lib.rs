//! SMC key values for the ASUS ambient light sensor and keyboard backlight.
//!
//! This crate implements the byte-level behavior of four SMC keys exposed by
//! ASUS laptops through an SMC emulator:
//!
//! | Key    | Type   | Size | Value                                   |
//! |--------|--------|------|-----------------------------------------|
//! | `ALSF` | `ui8 ` | 1    | ALS force bits ([`AlsForceMask`])       |
//! | `ALV0` | `{alv` | 10   | ALS reading ([`AlsValue`])              |
//! | `LKSB` | `{lkb` | 2    | Keyboard backlight level ([`LkbValue`]) |
//! | `LKSS` | `{lks` | 2    | Keyboard backlight status ([`LksValue`])|
//!
//! The lux cell, the light sensor and the backlight device are owned by the
//! caller and borrowed by the values, so they must outlive them.
//!
//! # Example
//!
//! ```
//! use asus_smc_keys::{
//!     AlsForceMask, AlsReading, AlsValue, ChannelSample, ForceBits, Intensity, KeyStore,
//!     LkbValue, MockBacklightDevice, MockChannelSource, SmcKey, SmcResult,
//! };
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let lux = AtomicU32::new(asus_smc_keys::lux_to_q18_14(120.0));
//! let force = AlsForceMask::default();
//! let sensor = MockChannelSource::new(ChannelSample { chan0: 100, chan1: 200, high_gain: false });
//! let keyboard = MockBacklightDevice::new();
//!
//! let mut store = KeyStore::new();
//! store.insert(&force);
//! store.insert(AlsValue::new(&lux, &force, &sensor));
//! store.insert(LkbValue::new(&keyboard));
//!
//! // Read the ambient light sensor
//! let mut buf = [0u8; 10];
//! assert_eq!(store.read(SmcKey::ALV0, &mut buf), SmcResult::Success);
//! assert_eq!(AlsReading::from_bytes(&buf).room_lux, 120 << 14);
//!
//! // Pin the lux value; hardware updates are ignored until released
//! force.force(ForceBits::FORCE_LUX);
//! lux.store(0, Ordering::Release);
//! store.read(SmcKey::ALV0, &mut buf);
//! assert_eq!(AlsReading::from_bytes(&buf).room_lux, 120 << 14);
//!
//! // Set the keyboard backlight to 0x6eb
//! assert_eq!(store.write(SmcKey::LKSB, &[0x6e, 0xb0]), SmcResult::Success);
//! assert_eq!(keyboard.current(), Some(Intensity::new(0x6eb).unwrap()));
//! ```
//!
//! # Testing
//!
//! Use [`MockChannelSource`] and [`MockBacklightDevice`] to test code without
//! hardware.

#![warn(missing_docs)]

mod als;
mod backlight;
mod codec;
mod error;
mod force;
mod keys;
mod mock;
mod store;
mod value;

// Re-export public API
pub use als::{ALS_VALUE_SIZE, AlsReading, AlsValue, ChannelSample, ChannelSource};
pub use backlight::{BacklightDevice, Intensity, LkbValue, LksValue, MalformedPolicy};
pub use codec::{
    INTENSITY_MAX, LUX_FRACTION_BITS, backlight_has_stray_bits, decode_backlight,
    encode_backlight, lux_to_q18_14, q18_14_to_lux,
};
pub use error::{DeviceError, SmcError};
pub use force::{AlsField, AlsForceMask, ForceBits, refresh_allowed};
pub use keys::{SmcKey, SmcResult, types};
pub use mock::{MockBacklightDevice, MockChannelSource};
pub use store::KeyStore;
pub use value::SmcValue;
