use crate::dom::Document;
use crate::error::{FilterError, Result};
use crate::policy::Policy;
use crate::serializer::OutputSerializer;
use crate::tree_filter::{RemovedNode, TreeFilter};

/// Whitelist HTML filter.
///
/// Holds a [`Policy`] and the document currently being cleaned. The policy
/// may be changed freely between calls; every call reads it fresh.
#[derive(Debug, Clone, Default)]
pub struct WhiteHtmlFilter {
    policy: Policy,
    document: Option<Document>,
}

impl WhiteHtmlFilter {
    /// Create a filter with the stock policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with a custom policy
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            policy,
            document: None,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut Policy {
        &mut self.policy
    }

    /// The document loaded by the last successful [`load`](Self::load).
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Load markup for cleaning. Returns whether a usable tree was produced;
    /// malformed markup is recovered, never rejected.
    pub fn load(&mut self, markup: &str) -> bool {
        let markup = markup.strip_prefix('\u{feff}').unwrap_or(markup);
        let markup = markup.replace('\r', "");

        match Document::parse_fragment(&markup) {
            Ok(document) => {
                self.document = Some(document);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load markup: {}", e);
                self.document = None;
                false
            }
        }
    }

    /// Load raw bytes, replacing invalid UTF-8 sequences.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> bool {
        self.load(&String::from_utf8_lossy(bytes))
    }

    /// Prune the loaded document. Returns every element that was detached.
    pub fn clean(&mut self) -> Result<Vec<RemovedNode>> {
        let document = self.document.as_mut().ok_or(FilterError::NoDocument)?;
        TreeFilter::new(&self.policy).run(document)
    }

    /// Render the current document as markup.
    pub fn output_html(&self) -> String {
        OutputSerializer::new(&self.policy).render(self.document.as_ref())
    }

    /// Load, clean and render `markup` in one call.
    pub fn sanitize(&mut self, markup: &str) -> Result<String> {
        if !self.load(markup) {
            return Err(FilterError::BackendUnavailable(
                "markup could not be loaded".to_string(),
            ));
        }
        self.clean()?;
        Ok(self.output_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_without_document() {
        let mut filter = WhiteHtmlFilter::new();
        assert!(matches!(filter.clean(), Err(FilterError::NoDocument)));
        assert_eq!(filter.output_html(), "");
    }

    #[test]
    fn test_load_strips_carriage_returns_and_bom() {
        let mut filter = WhiteHtmlFilter::new();
        assert!(filter.load("\u{feff}<p>a\r\nb</p>"));

        assert_eq!(filter.output_html(), "<p>a\nb</p>");
    }

    #[test]
    fn test_load_bytes_replaces_invalid_utf8() {
        let mut filter = WhiteHtmlFilter::new();
        assert!(filter.load_bytes(b"<b>ok\xff</b>"));
        filter.clean().unwrap();

        assert_eq!(filter.output_html(), "<b>ok\u{fffd}</b>");
    }

    #[test]
    fn test_policy_is_read_at_call_time() {
        let mut filter = WhiteHtmlFilter::new();
        filter.load("<div><b>x</b></div>");
        filter.policy_mut().deny_tag("b");

        let removed = filter.clean().unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(filter.output_html(), "<div>x</div>");
    }

    #[test]
    fn test_reload_replaces_document() {
        let mut filter = WhiteHtmlFilter::new();
        filter.load("<p>first</p>");
        filter.load("<p>second</p>");

        assert_eq!(filter.output_html(), "<p>second</p>");
    }

    #[test]
    fn test_sanitize_one_shot() {
        let mut filter = WhiteHtmlFilter::new();
        let clean = filter
            .sanitize(r#"<p>Hello</p><script>alert('XSS')</script>"#)
            .unwrap();

        assert_eq!(clean, "<p>Hello</p>alert('XSS')");
    }

    #[test]
    fn test_table_policy_needs_implied_tbody() {
        let markup = "<table><tr><td>1</td></tr></table>";

        let mut without = WhiteHtmlFilter::with_policy(
            Policy::empty()
                .with_tag("table", Vec::<&str>::new())
                .with_tag("tr", Vec::<&str>::new())
                .with_tag("td", Vec::<&str>::new()),
        );
        assert_eq!(without.sanitize(markup).unwrap(), "<table>1</table>");

        let mut with = WhiteHtmlFilter::with_policy(
            Policy::empty()
                .with_tag("table", Vec::<&str>::new())
                .with_tag("tbody", Vec::<&str>::new())
                .with_tag("tr", Vec::<&str>::new())
                .with_tag("td", Vec::<&str>::new()),
        );
        assert_eq!(
            with.sanitize(markup).unwrap(),
            "<table><tbody><tr><td>1</td></tr></tbody></table>"
        );
    }
}
