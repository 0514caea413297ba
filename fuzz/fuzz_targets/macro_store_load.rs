#![no_main]

use frontend::macro_store::{parse_store, render_store};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Line endings are normalised on load, so CR bytes do not round-trip.
    if text.contains('\r') {
        return;
    }
    let parsed = parse_store(text);

    // Whatever was recovered must survive a save and reload unchanged.
    let rendered = render_store(&parsed.macros);
    let reparsed = parse_store(&rendered);
    assert_eq!(reparsed.macros, parsed.macros);
    assert!(reparsed.diagnostics.is_empty());
});
