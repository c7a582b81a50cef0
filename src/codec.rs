//! Fixed-point and split-byte encodings.
//!
//! Everything here is pure arithmetic so it can be checked without hardware.

/// Number of fractional bits in a Q18.14 lux value.
pub const LUX_FRACTION_BITS: u32 = 14;

/// Largest keyboard backlight intensity (12 bits).
pub const INTENSITY_MAX: u16 = 0x0fff;

/// Convert lux to Q18.14. Negative and NaN inputs map to 0, large inputs saturate.
pub fn lux_to_q18_14(lux: f32) -> u32 {
    if lux.is_nan() || lux <= 0.0 {
        return 0;
    }
    let scaled = (lux as f64 * f64::from(1u32 << LUX_FRACTION_BITS)).round();
    if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Convert a Q18.14 value to lux.
pub fn q18_14_to_lux(raw: u32) -> f32 {
    (raw as f64 / f64::from(1u32 << LUX_FRACTION_BITS)) as f32
}

/// Split a 12-bit intensity into `(val1, val2)`.
///
/// `val1` holds bits 11-4, the high nibble of `val2` holds bits 3-0.
/// Bits above the 12-bit range are dropped.
pub fn encode_backlight(intensity: u16) -> (u8, u8) {
    let intensity = intensity & INTENSITY_MAX;
    ((intensity >> 4) as u8, ((intensity & 0x0f) << 4) as u8)
}

/// Join `(val1, val2)` into a 12-bit intensity.
///
/// The low nibble of `val2` is not part of the encoding and is ignored, so the
/// result never exceeds [`INTENSITY_MAX`].
pub fn decode_backlight(val1: u8, val2: u8) -> u16 {
    (u16::from(val1) << 4) | u16::from(val2 >> 4)
}

/// Whether `val2` carries bits outside the encoding.
pub fn backlight_has_stray_bits(val2: u8) -> bool {
    val2 & 0x0f != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backlight_reference_value() {
        assert_eq!(encode_backlight(0x6eb), (0x6e, 0xb0));
        assert_eq!(decode_backlight(0x6e, 0xb0), 0x6eb);
    }

    #[test]
    fn test_backlight_roundtrip_full_range() {
        for intensity in 0..=INTENSITY_MAX {
            let (val1, val2) = encode_backlight(intensity);
            assert!(!backlight_has_stray_bits(val2));
            assert_eq!(decode_backlight(val1, val2), intensity);
        }
    }

    #[test]
    fn test_backlight_stray_bits_masked() {
        assert!(backlight_has_stray_bits(0xff));
        assert_eq!(decode_backlight(0xff, 0xff), 0xfff);
        assert_eq!(decode_backlight(0x00, 0x0f), 0);
    }

    #[test]
    fn test_backlight_encode_drops_high_bits() {
        assert_eq!(encode_backlight(0xffff), (0xff, 0xf0));
    }

    #[test]
    fn test_lux_conversion() {
        assert_eq!(lux_to_q18_14(4.0), 0x0001_0000);
        assert_eq!(lux_to_q18_14(1.0), 0x0000_4000);
        assert_eq!(lux_to_q18_14(0.5), 0x0000_2000);
        assert_eq!(q18_14_to_lux(0x0001_0000), 4.0);
        assert_eq!(q18_14_to_lux(0x0000_2000), 0.5);
    }

    #[test]
    fn test_lux_conversion_limits() {
        assert_eq!(lux_to_q18_14(-3.0), 0);
        assert_eq!(lux_to_q18_14(f32::NAN), 0);
        assert_eq!(lux_to_q18_14(1.0e9), u32::MAX);
        assert_eq!(lux_to_q18_14(f32::INFINITY), u32::MAX);
    }
}
