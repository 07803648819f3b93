#![no_main]

use gojava::backend::{GeneratorOptions, generate_unit};
use gojava::frontend::{ParserStrategy, parse_declaration, parse_unit};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        for strategy in [ParserStrategy::Scan, ParserStrategy::Grammar] {
            let unit = parse_unit(s, strategy);
            // Empty units are an error, never a panic
            let _ = generate_unit(&unit, None, &GeneratorOptions::default());
        }
        let _ = parse_declaration(s);
    }
});
