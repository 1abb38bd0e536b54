#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = sdscheme::source::split_forms(s);
        // Deep nesting overflows the host stack; keep inputs shallow
        if s.matches('(').count() <= 64 {
            let interp = sdscheme::Interpreter::with_display_output(|_| {});
            let _ = interp.evaluate(s);
        }
    }
});
