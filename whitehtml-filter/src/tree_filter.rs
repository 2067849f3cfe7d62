//! Whitelist pruning.
//!
//! Children are visited from the last index to the first. Replacing or
//! removing the child at index `i` only shifts entries after `i`, which have
//! already been visited, so the walk can mutate the live child list.

use crate::attributes::AttributeSanitizer;
use crate::dom::{Document, NodeId};
use crate::error::{FilterError, Result};
use crate::policy::Policy;

/// Characters that do not count as visible text.
const BLANK_CHARS: &[char] = &[' ', '\u{3000}', '\n', '\r', '\t'];

/// What happened to a pruned element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Detached with no trace.
    Removed,
    /// Swapped for a text node holding its text content.
    ReplacedWithText,
}

/// Handle to an element detached during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedNode {
    pub id: NodeId,
    pub tag_name: String,
    pub disposition: Disposition,
}

/// Walks a [`Document`] and prunes everything the policy does not allow.
pub struct TreeFilter<'a> {
    policy: &'a Policy,
    attributes: AttributeSanitizer<'a>,
}

impl<'a> TreeFilter<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self {
            policy,
            attributes: AttributeSanitizer::new(policy),
        }
    }

    /// Filter the whole document from its container. The container itself is
    /// never pruned, but its attributes are cleaned.
    pub fn run(&self, document: &mut Document) -> Result<Vec<RemovedNode>> {
        let root = document.root();
        let removed = self.clean_nodes(document, root, true)?;
        tracing::debug!(removed = removed.len(), "Whitelist pass complete");
        Ok(removed)
    }

    /// Clean element `id`, returning every element detached beneath it
    /// (or `id` itself when it is pruned).
    ///
    /// Uses an explicit work stack so nesting depth is bounded by memory, not
    /// by the call stack. Pushing children first to last pops them last to
    /// first, and a child's subtree is finished before its previous sibling.
    pub fn clean_nodes(
        &self,
        document: &mut Document,
        id: NodeId,
        is_root: bool,
    ) -> Result<Vec<RemovedNode>> {
        let mut removed = Vec::new();
        let mut stack = vec![(id, is_root)];

        while let Some((current, is_root)) = stack.pop() {
            let Some(tag) = document.tag_name(current).map(str::to_string) else {
                continue;
            };

            if !is_root && !self.policy.is_tag_allowed(&tag) {
                removed.push(self.prune(document, current, tag)?);
                continue;
            }

            if document
                .element(current)
                .is_some_and(|element| !element.attributes.is_empty())
            {
                self.attributes.clean(document, current);
            }

            stack.extend(
                document
                    .children(current)
                    .iter()
                    .filter(|&&child| document.element(child).is_some())
                    .map(|&child| (child, false)),
            );
        }
        Ok(removed)
    }

    fn prune(&self, document: &mut Document, id: NodeId, tag: String) -> Result<RemovedNode> {
        let parent = document.parent(id).ok_or_else(|| {
            FilterError::InternalMutationFailure(format!(
                "<{}> has no parent to be removed from",
                tag
            ))
        })?;

        let text = document.text_content(id);
        let disposition = if has_visible_text(&text) {
            let replacement = document.create_text(text);
            document.replace_child(parent, replacement, id)?;
            Disposition::ReplacedWithText
        } else {
            document.remove_child(parent, id)?;
            Disposition::Removed
        };

        tracing::debug!(?disposition, "Stripped disallowed element <{}>", tag);
        Ok(RemovedNode {
            id,
            tag_name: tag,
            disposition,
        })
    }
}

/// Whether `text` keeps anything once blank characters are deleted.
pub fn has_visible_text(text: &str) -> bool {
    text.chars().any(|c| !BLANK_CHARS.contains(&c))
}
