#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary TOML must never panic the loader or the validator.
fuzz_target!(|data: &str| {
    if let Ok(cfg) = gforce_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // A config that validates must describe a buildable pipeline.
            assert!(cfg.render.rate_hz <= cfg.sensor.rate_hz);
            assert!(cfg.axes.lateral != cfg.axes.longitudinal);
        }
    }
});
