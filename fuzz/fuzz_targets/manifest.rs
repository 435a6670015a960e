#![no_main]

use libfuzzer_sys::fuzz_target;
use tbrun::DriverConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any manifest that parses must also survive validation
        if let Ok(config) = DriverConfig::from_json_str(s) {
            let _ = config.validate();
        }
    }
});
