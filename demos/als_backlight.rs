//! Example: Serve the ALS and keyboard backlight keys with mock hardware.
//!
//! Run with: `RUST_LOG=debug cargo run --example als_backlight`

use asus_smc_keys::{
    AlsForceMask, AlsReading, AlsValue, ChannelSample, ForceBits, KeyStore, LkbValue, LksValue,
    MockBacklightDevice, MockChannelSource, SmcKey, SmcResult, lux_to_q18_14, q18_14_to_lux,
};
use std::sync::atomic::{AtomicU32, Ordering};

fn main() {
    // Initialize logging (optional)
    env_logger::init();

    // Hardware-side state owned by the caller
    let lux = AtomicU32::new(lux_to_q18_14(230.5));
    let force = AlsForceMask::default();
    let sensor = MockChannelSource::new(ChannelSample {
        chan0: 812,
        chan1: 97,
        high_gain: true,
    });
    let keyboard = MockBacklightDevice::new();

    let mut store = KeyStore::new();
    store.insert(&force);
    store.insert(AlsValue::new(&lux, &force, &sensor));
    store.insert(LkbValue::new(&keyboard));
    store.insert(LksValue::new());

    for key in store.keys() {
        if let Some((size, key_type)) = store.info(key) {
            println!("{} [{}] {} bytes", key, key_type, size);
        }
    }

    let mut buf = [0u8; 10];
    store.read(SmcKey::ALV0, &mut buf);
    let reading = AlsReading::from_bytes(&buf);
    println!(
        "ALV0 {:02x?} -> {:.2} lux (chan0={}, chan1={})",
        buf,
        q18_14_to_lux(reading.room_lux),
        reading.chan0,
        reading.chan1
    );

    // Pin lux, then let the sensor move
    store.write(SmcKey::ALSF, &[ForceBits::FORCE_LUX]);
    lux.store(lux_to_q18_14(5.0), Ordering::Release);
    store.read(SmcKey::ALV0, &mut buf);
    println!(
        "ALV0 with lux forced -> {:.2} lux",
        q18_14_to_lux(AlsReading::from_bytes(&buf).room_lux)
    );

    match store.write(SmcKey::LKSB, &[0x6e, 0xb0]) {
        SmcResult::Success => println!("Keyboard backlight: {:?}", keyboard.current()),
        status => eprintln!("Error setting backlight: {:?}", status),
    }

    keyboard.set_failing(true);
    let status = store.write(SmcKey::LKSB, &[0x10, 0x00]);
    println!(
        "Failed write -> {:?} ({:#04x}), backlight still {:?}",
        status,
        status.code(),
        keyboard.current()
    );
}
