#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that parses and encodes must read back unchanged.
    if let Ok(info) = mkp_core::decode_info(data) {
        if let Ok(encoded) = mkp_core::encode_info(&info) {
            let reparsed = mkp_core::decode_info(&encoded).expect("encoded info must parse");
            assert_eq!(reparsed, info);
        }
    }
});
