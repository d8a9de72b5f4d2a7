#![no_main]

use libfuzzer_sys::fuzz_target;

// Accepts arbitrary bytes, attempts to parse as JSON, feeds to transform().
// Goal: no panics, even on malformed input. The document doubles as its own
// instance so the matching path is exercised too.
fuzz_target!(|data: &[u8]| {
    if let Ok(schema) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = jsonschema_form_core::transform(&schema, None);
        let _ = jsonschema_form_core::transform(&schema, Some(&schema));
    }
});
