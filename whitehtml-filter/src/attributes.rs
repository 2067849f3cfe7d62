use crate::dom::{Attribute, Document, NodeId};
use crate::policy::{DATA_WILDCARD, Policy};
use crate::value::AttributeValueSanitizer;

/// Strips attributes the policy does not allow on an element and rewrites the
/// values of the rest.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSanitizer<'a> {
    policy: &'a Policy,
    values: AttributeValueSanitizer<'a>,
}

impl<'a> AttributeSanitizer<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self {
            policy,
            values: AttributeValueSanitizer::new(policy),
        }
    }

    /// Clean the attributes of element `id` in place. Text nodes are ignored.
    pub fn clean(&self, document: &mut Document, id: NodeId) {
        let Some(tag) = document.tag_name(id).map(str::to_string) else {
            return;
        };
        let allowed = self.policy.attributes_allowed(&tag);
        let wildcard_data = allowed.contains(DATA_WILDCARD);

        let Some(attributes) = document.attributes_mut(id) else {
            return;
        };
        let retained: Vec<Attribute> = attributes
            .drain(..)
            .filter(|attr| {
                let name = attr.name.to_lowercase();
                let keep = is_plain_name(&name)
                    && (allowed.contains(name.as_str())
                        || (wildcard_data && name.starts_with("data-")));
                if !keep {
                    tracing::trace!("Removed attribute `{}` from <{}>", attr.name, tag);
                }
                keep
            })
            .map(|attr| Attribute {
                value: self.values.sanitize(&attr.name, &attr.value),
                name: attr.name,
            })
            .collect();
        *attributes = retained;
    }
}

/// Whether `name` is made only of `[A-Za-z0-9_:.-]`. The tokenizer accepts
/// quotes and `<` in attribute names, which the output would carry verbatim.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '-'))
}
