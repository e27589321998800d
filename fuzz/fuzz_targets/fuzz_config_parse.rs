#![no_main]

use libfuzzer_sys::fuzz_target;

use stakevest_node::{DeploymentConfig, Script};

// Arbitrary text must be rejected cleanly by the config and script parsers.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = DeploymentConfig::from_toml_str(text);
        let _ = Script::from_toml_str(text);
    }
});
