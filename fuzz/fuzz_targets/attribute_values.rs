//! Fuzz target for attribute value sanitization.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use whitehtml_filter::{AttributeValueSanitizer, Policy};

/// Arbitrary attribute for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzAttribute {
    name: String,
    value: String,
}

fuzz_target!(|attr: FuzzAttribute| {
    let policy = Policy::default()
        .with_styles(["color", "font-size"])
        .with_classes(["a", "b"]);
    let sanitizer = AttributeValueSanitizer::new(&policy);

    let once = sanitizer.sanitize(&attr.name, &attr.value);

    // URL and class rewriting are stable under a second application.
    for name in ["href", "src", "class"] {
        let first = sanitizer.sanitize(name, &attr.value);
        assert_eq!(sanitizer.sanitize(name, &first), first);
    }

    if attr.name.eq_ignore_ascii_case("href") || attr.name.eq_ignore_ascii_case("src") {
        let lowered = once.to_ascii_lowercase();
        assert!(!lowered.starts_with("javascript:"));
    }
});
