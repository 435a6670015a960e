#![no_main]

use libfuzzer_sys::fuzz_target;
use tbrun::engine::library::scan_entities;

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);
    for name in scan_entities(&source) {
        assert!(!name.is_empty());
        assert_eq!(name, name.to_ascii_lowercase());
    }
});
