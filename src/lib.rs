// whitehtml - Whitelist HTML filter for Rust
//
// This library strips untrusted markup down to a whitelist of tags,
// attributes, CSS properties and CSS classes.

// Re-export the filter
pub use whitehtml_filter::*;

pub mod prelude {
    pub use whitehtml_filter::{
        Disposition, FilterError, Policy, RemovedNode, Result, WhiteHtmlFilter,
    };
}
