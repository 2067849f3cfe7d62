//! # whitehtml filter
//!
//! Whitelist-based HTML filtering for user-supplied rich text.
//!
//! ## Features
//!
//! - ✅ **Tag Whitelist** - Disallowed elements are removed, or replaced by their text
//! - ✅ **Attribute Whitelist** - Per-tag and global attributes, with a `data-*` wildcard
//! - ✅ **Style Filtering** - Only whitelisted CSS properties survive
//! - ✅ **Class Filtering** - Only whitelisted class tokens survive
//! - ✅ **URL Neutralization** - `javascript:` URLs in `href`/`src` are blanked
//! - ✅ **Defense in Depth** - Non-whitelisted tags are stripped again from the output
//! - ✅ **File Policies** - Load whitelists from JSON or TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use whitehtml_filter::{Policy, WhiteHtmlFilter};
//!
//! let policy = Policy::default()
//!     .with_styles(["color"])
//!     .with_classes(["contain", "sider"]);
//! let mut filter = WhiteHtmlFilter::with_policy(policy);
//!
//! filter.load(r#"<span style="color: #f00;float:right;" class="aabc">test</span>"#);
//! let removed = filter.clean().unwrap();
//! assert!(removed.is_empty());
//! assert_eq!(
//!     filter.output_html(),
//!     r#"<span style="color:#f00;" class="">test</span>"#
//! );
//! ```
//!
//! ## Removed Elements
//!
//! A disallowed element with visible text is replaced by that text, so
//! stripping a container never loses what the user wrote:
//!
//! ```rust
//! use whitehtml_filter::{Disposition, WhiteHtmlFilter};
//!
//! let mut filter = WhiteHtmlFilter::new();
//! filter.load("<div><button>Login</button><iframe></iframe></div>");
//!
//! let removed = filter.clean().unwrap();
//! assert_eq!(removed.len(), 2);
//! assert!(removed.iter().any(|node| node.tag_name == "button"
//!     && node.disposition == Disposition::ReplacedWithText));
//! assert_eq!(filter.output_html(), "<div>Login</div>");
//! ```
//!
//! ## Policy Files
//!
//! ```rust
//! use whitehtml_filter::Policy;
//!
//! let policy = Policy::from_toml_str(r#"
//! global_attributes = ["class", "data-*"]
//! styles = ["color"]
//!
//! [tags]
//! p = []
//! a = ["href"]
//! "#).unwrap();
//!
//! assert!(policy.is_tag_allowed("A"));
//! assert!(policy.attributes_allowed("a").contains("href"));
//! ```

pub mod attributes;
pub mod dom;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod loader;
pub mod policy;
pub mod serializer;
pub mod tree_filter;
pub mod value;

pub use attributes::AttributeSanitizer;
pub use dom::{Attribute, Document, ElementData, NodeData, NodeId};
pub use encoder::MarkupEncoder;
pub use error::{FilterError, Result};
pub use filter::WhiteHtmlFilter;
pub use loader::{FileFormat, PolicyLoader};
pub use policy::{DATA_WILDCARD, Policy};
pub use serializer::OutputSerializer;
pub use tree_filter::{Disposition, RemovedNode, TreeFilter};
pub use value::AttributeValueSanitizer;
