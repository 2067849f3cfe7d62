//! Fuzz target for the full load/clean/render pass.
//!
//! Arbitrary markup must never panic, must leave only whitelisted elements
//! in the tree, and must never render a script tag.

#![no_main]

use libfuzzer_sys::fuzz_target;
use whitehtml_filter::{Policy, WhiteHtmlFilter};

fuzz_target!(|data: &[u8]| {
    let policy = Policy::default()
        .with_styles(["color"])
        .with_classes(["contain"]);
    let mut filter = WhiteHtmlFilter::with_policy(policy);

    if !filter.load_bytes(data) {
        return;
    }
    filter.clean().expect("clean must not fail on parsed input");

    let document = filter.document().expect("document was loaded");
    for id in document.elements().into_iter().skip(1) {
        let tag = document.tag_name(id).unwrap_or_default();
        assert!(filter.policy().is_tag_allowed(tag), "<{}> survived", tag);
    }

    let output = filter.output_html();
    assert!(!output.to_ascii_lowercase().contains("<script"));
});
