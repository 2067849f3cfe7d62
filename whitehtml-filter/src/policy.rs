//! Whitelist policy.
//!
//! A [`Policy`] enumerates the tags, attributes, CSS properties and CSS class
//! tokens that survive a filtering pass. Every name is lowercased when it is
//! inserted and again when it is queried, so membership tests never depend on
//! the case used by the markup or by the caller.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Attribute wildcard enabling every `data-` prefixed attribute on a tag.
pub const DATA_WILDCARD: &str = "data-*";

/// Whitelist configuration consulted by a filtering pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PolicyFile")]
pub struct Policy {
    tags: BTreeMap<String, BTreeSet<String>>,
    global_attributes: BTreeSet<String>,
    styles: BTreeSet<String>,
    classes: BTreeSet<String>,
}

/// Raw on-disk shape; canonicalized into a [`Policy`] on deserialize.
#[derive(Debug, Default, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    tags: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    global_attributes: Vec<String>,
    #[serde(default)]
    styles: Vec<String>,
    #[serde(default)]
    classes: Vec<String>,
}

impl From<PolicyFile> for Policy {
    fn from(file: PolicyFile) -> Self {
        let mut policy = Policy::empty();
        for (tag, attrs) in file.tags {
            policy.allow_tag(&tag, attrs);
        }
        policy.allow_global_attributes(file.global_attributes);
        policy.allow_styles(file.styles);
        policy.allow_classes(file.classes);
        policy
    }
}

fn canonical(name: &str) -> String {
    name.trim().to_lowercase()
}

fn canonical_set<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| canonical(name.as_ref()))
        .filter(|name| !name.is_empty())
        .collect()
}

const STOCK_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "target"]),
    ("abbr", &[]),
    ("address", &[]),
    ("area", &["shape", "coords", "href", "alt"]),
    ("article", &[]),
    ("aside", &[]),
    ("audio", &["autoplay", "controls", "loop", "preload", "src"]),
    ("b", &[]),
    ("bdi", &["dir"]),
    ("bdo", &["dir"]),
    ("big", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("caption", &[]),
    ("center", &[]),
    ("cite", &[]),
    ("code", &[]),
    ("col", &["align", "valign", "span", "width"]),
    ("colgroup", &["align", "valign", "span", "width"]),
    ("dd", &[]),
    ("del", &["datetime"]),
    ("details", &["open"]),
    ("div", &[]),
    ("dl", &[]),
    ("dt", &[]),
    ("em", &[]),
    ("font", &["color", "size", "face"]),
    ("footer", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("header", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "width", "height"]),
    ("ins", &["datetime"]),
    ("li", &[]),
    ("mark", &[]),
    ("nav", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("pre", &[]),
    ("s", &[]),
    ("section", &[]),
    ("small", &[]),
    ("source", &["src", "type"]),
    ("span", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("summary", &[]),
    ("sup", &[]),
    ("table", &["width", "border", "align", "valign"]),
    ("tbody", &["align", "valign"]),
    ("td", &["width", "rowspan", "colspan", "align", "valign"]),
    ("tfoot", &["align", "valign"]),
    ("th", &["width", "rowspan", "colspan", "align", "valign"]),
    ("thead", &["align", "valign"]),
    ("tr", &["rowspan", "align", "valign"]),
    ("tt", &[]),
    ("u", &[]),
    ("ul", &[]),
    (
        "video",
        &["autoplay", "controls", "loop", "preload", "src", "height", "width"],
    ),
];

const STOCK_GLOBAL_ATTRIBUTES: &[&str] = &[
    "accesskey",
    "class",
    "dir",
    "id",
    "lang",
    "style",
    "tabindex",
    "title",
    "translate",
    DATA_WILDCARD,
];

impl Policy {
    /// A policy that allows nothing.
    pub fn empty() -> Self {
        Self {
            tags: BTreeMap::new(),
            global_attributes: BTreeSet::new(),
            styles: BTreeSet::new(),
            classes: BTreeSet::new(),
        }
    }

    /// Allow `tag` with the given tag-specific attributes, merging with any
    /// attributes already allowed for it.
    ///
    /// The parser inserts implied elements such as `tbody` between `table`
    /// and `tr`. A policy that allows `table`, `tr` and `td` must allow
    /// `tbody` too, or every table is reduced to its text.
    pub fn allow_tag<I, S>(&mut self, tag: &str, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tag = canonical(tag);
        if !tag.is_empty() {
            self.tags
                .entry(tag)
                .or_default()
                .extend(canonical_set(attributes));
        }
        self
    }

    /// Remove `tag` from the whitelist.
    pub fn deny_tag(&mut self, tag: &str) -> &mut Self {
        self.tags.remove(&canonical(tag));
        self
    }

    pub fn allow_global_attributes<I, S>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.global_attributes.extend(canonical_set(attributes));
        self
    }

    pub fn allow_styles<I, S>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.styles.extend(canonical_set(properties));
        self
    }

    pub fn allow_classes<I, S>(&mut self, classes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.classes.extend(canonical_set(classes));
        self
    }

    pub fn clear_tags(&mut self) -> &mut Self {
        self.tags.clear();
        self
    }

    pub fn clear_global_attributes(&mut self) -> &mut Self {
        self.global_attributes.clear();
        self
    }

    /// Empty the style whitelist, which disables style filtering entirely.
    pub fn clear_styles(&mut self) -> &mut Self {
        self.styles.clear();
        self
    }

    /// Empty the class whitelist, which disables class filtering entirely.
    pub fn clear_classes(&mut self) -> &mut Self {
        self.classes.clear();
        self
    }

    /// Builder form of [`Policy::allow_tag`].
    pub fn with_tag<I, S>(mut self, tag: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allow_tag(tag, attributes);
        self
    }

    /// Builder form of [`Policy::allow_styles`].
    pub fn with_styles<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allow_styles(properties);
        self
    }

    /// Builder form of [`Policy::allow_classes`].
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allow_classes(classes);
        self
    }

    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        self.tags.contains_key(&canonical(tag))
    }

    /// Tag-specific attributes of `tag` united with the global attributes.
    /// A tag without an entry contributes no specific attributes.
    pub fn attributes_allowed(&self, tag: &str) -> BTreeSet<&str> {
        let mut allowed: BTreeSet<&str> =
            self.global_attributes.iter().map(String::as_str).collect();
        if let Some(specific) = self.tags.get(&canonical(tag)) {
            allowed.extend(specific.iter().map(String::as_str));
        }
        allowed
    }

    pub fn is_style_allowed(&self, property: &str) -> bool {
        self.styles.contains(&canonical(property))
    }

    pub fn is_class_allowed(&self, class: &str) -> bool {
        self.classes.contains(&canonical(class))
    }

    /// Whether style values are filtered at all.
    pub fn filters_styles(&self) -> bool {
        !self.styles.is_empty()
    }

    /// Whether class values are filtered at all.
    pub fn filters_classes(&self) -> bool {
        !self.classes.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn global_attributes(&self) -> impl Iterator<Item = &str> {
        self.global_attributes.iter().map(String::as_str)
    }

    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl Default for Policy {
    /// Stock whitelist for user-supplied rich text. Style and class
    /// whitelists start empty, so those values pass through unfiltered.
    fn default() -> Self {
        let mut policy = Self::empty();
        for (tag, attrs) in STOCK_TAGS {
            policy.allow_tag(tag, attrs.iter());
        }
        policy.allow_global_attributes(STOCK_GLOBAL_ATTRIBUTES.iter());
        policy
    }
}
