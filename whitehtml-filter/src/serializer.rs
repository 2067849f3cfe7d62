//! Markup output.
//!
//! Rendering happens in two steps. The tree is written out as markup, then
//! every tag marker whose name is not whitelisted is stripped from the text.
//! The second step removes the parser's own container wrapper and anything
//! else that slipped past the tree filter; it never touches text between
//! tags.

use crate::dom::{Document, NodeData, NodeId};
use crate::encoder::MarkupEncoder;
use crate::policy::Policy;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Elements that never have content and are written as `<br/>`.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

// Comments, declarations, processing instructions, and start/end tags with
// quoted attribute values.
static TAG_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<[!?][^>]*>|</?([A-Za-z][A-Za-z0-9:-]*)(?:[^>"']|"[^"]*"|'[^']*')*>"#,
    )
    .unwrap()
});

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

pub struct OutputSerializer<'a> {
    policy: &'a Policy,
}

impl<'a> OutputSerializer<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self { policy }
    }

    /// Render `document`, or the empty string when there is none.
    pub fn render(&self, document: Option<&Document>) -> String {
        let Some(document) = document else {
            return String::new();
        };

        let mut markup = String::new();
        write_node(document, document.root(), &mut markup);

        let stripped = self.strip_tags(&markup);
        stripped
            .trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
            .to_string()
    }

    /// Remove every tag marker the policy does not whitelist.
    pub fn strip_tags(&self, markup: &str) -> String {
        TAG_MARKER
            .replace_all(markup, |caps: &Captures| match caps.get(1) {
                Some(name) if self.policy.is_tag_allowed(name.as_str()) => caps[0].to_string(),
                Some(name) => {
                    tracing::trace!("Stripped tag marker <{}> from output", name.as_str());
                    String::new()
                }
                None => String::new(),
            })
            .into_owned()
    }
}

/// Elements whose first newline is dropped by the parser.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["listing", "pre", "textarea"];

enum Step {
    Enter(NodeId),
    Leave(NodeId),
}

fn write_node(document: &Document, id: NodeId, out: &mut String) {
    let mut steps = vec![Step::Enter(id)];

    while let Some(step) = steps.pop() {
        let current = match step {
            Step::Enter(current) => current,
            Step::Leave(current) => {
                if let Some(element) = document.element(current) {
                    out.push_str("</");
                    out.push_str(&element.name);
                    out.push('>');
                }
                continue;
            }
        };

        let element = match document.data(current) {
            NodeData::Text(text) => {
                MarkupEncoder::encode_text(text, out);
                continue;
            }
            NodeData::Element(element) => element,
        };

        out.push('<');
        out.push_str(&element.name);
        for attr in &element.attributes {
            out.push(' ');
            out.push_str(&attr.name);
            out.push_str("=\"");
            MarkupEncoder::encode_attribute(&attr.value, out);
            out.push('"');
        }

        let children = document.children(current);
        if children.is_empty() && is_void_element(&element.name) {
            out.push_str("/>");
            continue;
        }

        out.push('>');
        if drops_leading_newline(&element.name)
            && children.first().is_some_and(|&first| {
                matches!(document.data(first), NodeData::Text(text) if text.starts_with('\n'))
            })
        {
            out.push('\n');
        }

        steps.push(Step::Leave(current));
        steps.extend(children.iter().rev().map(|&child| Step::Enter(child)));
    }
}

fn drops_leading_newline(name: &str) -> bool {
    LEADING_NEWLINE_ELEMENTS
        .iter()
        .any(|element| element.eq_ignore_ascii_case(name))
}
