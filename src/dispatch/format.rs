//! Output-format negotiation.
//!
//! A small ordered table of (format, predicate) pairs; the first predicate
//! that matches the request decides the format. The default table only
//! recognizes HTML; the other formats are extension points for content
//! negotiation.

use crate::request::Request;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    AjaxHtml,
    Json,
    Xml,
}

type FormatPredicate = fn(&dyn Request) -> bool;

/// Ordered format-recognition table, first match wins.
pub struct FormatTable {
    entries: Vec<(OutputFormat, FormatPredicate)>,
}

impl FormatTable {
    pub fn new(entries: Vec<(OutputFormat, FormatPredicate)>) -> Self {
        Self { entries }
    }

    pub fn recognize(&self, request: &dyn Request) -> Option<OutputFormat> {
        self.entries
            .iter()
            .find(|(_, matches)| matches(request))
            .map(|(format, _)| *format)
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::new(vec![(OutputFormat::Html, |_| true)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRequest;

    #[test]
    fn default_table_always_recognizes_html() {
        let request = FakeRequest::get("/");
        assert_eq!(
            FormatTable::default().recognize(&request),
            Some(OutputFormat::Html)
        );
    }

    #[test]
    fn first_matching_entry_wins() {
        let table = FormatTable::new(vec![
            (OutputFormat::Json, |req| req.param("format").as_deref() == Some("json")),
            (OutputFormat::Html, |_| true),
        ]);

        let plain = FakeRequest::get("/");
        assert_eq!(table.recognize(&plain), Some(OutputFormat::Html));

        let json = FakeRequest::get("/").with_param("format", "json");
        assert_eq!(table.recognize(&json), Some(OutputFormat::Json));
    }

    #[test]
    fn empty_table_recognizes_nothing() {
        let table = FormatTable::new(Vec::new());
        let request = FakeRequest::get("/");
        assert_eq!(table.recognize(&request), None);
    }
}
