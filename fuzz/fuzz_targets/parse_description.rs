#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(description) = tempus_syntax::parse_description(s) {
            let _ = tempus_game::validate(&description.game, &description.objective);
        }
    }
});
