#![no_main]

use libfuzzer_sys::fuzz_target;
use mkp_core::{Package, ReadLimits};

fuzz_target!(|data: &[u8]| {
    let limits = ReadLimits {
        max_decode_bytes: 4 * 1024 * 1024,
        ..ReadLimits::default()
    };
    if let Ok(package) = Package::open_with_limits(data, limits) {
        let _ = package.files();
        let _ = package.entry_names();
    }
});
