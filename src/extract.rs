//! Pulls the header table and body text out of a cable page.
//!
//! Cable pages follow one fixed template: a `<table class="cable">` whose
//! `<th>` cells name the header fields and whose links carry their values,
//! followed by the cable text inside one or more `<code><pre>` blocks.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use dom_query::Document;
use regex::Regex;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::CableDocument;

/// Selector for the metadata table.
pub const HEADER_TABLE: &str = "table.cable";

const PILCROW: char = '\u{00B6}';

/// Body text blocks; non-greedy so several blocks on one line stay separate.
static BODY_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<code><pre>(.*?)</pre></code>").expect("BODY_BLOCK regex")
});

/// Encoded newline as the cable pages write it (`&#x000A;`), plus the
/// other numeric spellings of U+000A.
static NEWLINE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&#x0*a;|&#0*10;").expect("NEWLINE_ENTITY regex"));

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").expect("LINK regex"));

/// Extract headers and body from one cable page.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the page has no body block or no header table.
pub fn extract(html: &str) -> Result<CableDocument> {
    let body = extract_body(html)?;
    let headers = extract_headers(html)?;
    Ok(CableDocument { headers, body })
}

/// Concatenate every body block in document order, cleaned up for plain text.
///
/// # Errors
///
/// Returns [`Error::Parse`] if no `<code><pre>` block is present.
pub fn extract_body(html: &str) -> Result<String> {
    let mut blocks = BODY_BLOCK.captures_iter(html).peekable();
    if blocks.peek().is_none() {
        return Err(Error::Parse("no <code><pre> body block found".into()));
    }

    let mut body = String::new();
    for caps in blocks {
        body.push_str(&clean_body(&caps[1]));
    }
    Ok(body)
}

fn clean_body(raw: &str) -> String {
    // Line breaks in the source markup are layout only; real ones are encoded.
    let text: String = raw
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect();
    let text = NEWLINE_ENTITY.replace_all(&text, "\n");
    let text = LINK.replace_all(&text, "$1");
    text.replace(PILCROW, "")
}

/// Pair the `<th>` labels of the header table with its link texts.
///
/// Pairing is positional. When the two lists differ in length the extra
/// entries of the longer one are dropped.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the page has no `table.cable`.
pub fn extract_headers(html: &str) -> Result<Vec<(String, String)>> {
    let document = Document::from(html);
    let tables = document.select(HEADER_TABLE);
    let Some(table) = tables.iter().last() else {
        return Err(Error::Parse(format!("no {HEADER_TABLE} header table found")));
    };

    let labels: Vec<String> = table
        .select("th")
        .iter()
        .map(|th| th.text().trim().to_string())
        .collect();
    let values: Vec<String> = table
        .select("a")
        .iter()
        .map(|a| a.text().trim().to_string())
        .collect();

    if labels.len() != values.len() {
        warn!(
            labels = labels.len(),
            values = values.len(),
            "header label/value count mismatch, keeping the shorter list"
        );
    }

    Ok(labels.into_iter().zip(values).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(table: &str, body: &str) -> String {
        format!(
            "<html><head><title>cable</title></head><body>\n{table}\n\
             <div class='text'><code><pre>{body}</pre></code></div>\n</body></html>"
        )
    }

    const TABLE: &str = "<table class='cable'>\
        <tr><th>Reference ID</th><th>Created</th><th>Classification</th><th>Origin</th></tr>\
        <tr><td><a href='/cable/2010/01/10STATE001.html'>10STATE001</a></td>\
        <td><a href='/date/2010-01_0.html'>2010-01-04 12:00</a></td>\
        <td><a href='/classification/0.html'>UNCLASSIFIED</a></td>\
        <td><a href='/origin/1.html'>Secretary of State</a></td></tr></table>";

    #[test]
    fn pairs_labels_with_link_values_in_order() {
        let doc = extract(&page(TABLE, "SUBJECT: TEST")).unwrap();
        assert_eq!(
            doc.headers,
            vec![
                ("Reference ID".to_string(), "10STATE001".to_string()),
                ("Created".to_string(), "2010-01-04 12:00".to_string()),
                ("Classification".to_string(), "UNCLASSIFIED".to_string()),
                ("Origin".to_string(), "Secretary of State".to_string()),
            ]
        );
        assert_eq!(doc.body, "SUBJECT: TEST");
    }

    #[test]
    fn body_entities_links_and_pilcrows_are_cleaned() {
        let body = "\u{00B6}1. SUMMARY: see&#x000A;<a href='#par2'>para 2</a> below.&#x000A;&#x000A;\u{00B6}2. END";
        let doc = extract(&page(TABLE, body)).unwrap();
        assert_eq!(doc.body, "1. SUMMARY: see\npara 2 below.\n\n2. END");
        assert!(!doc.body.contains("<a"));
        assert!(!doc.body.contains('\u{00B6}'));
    }

    #[test]
    fn several_body_blocks_are_concatenated() {
        let html = format!(
            "{TABLE}<code><pre>FIRST </pre></code><p>x</p><code><pre>SECOND</pre></code>\n\
             <code><pre>THIRD</pre></code>"
        );
        assert_eq!(extract(&html).unwrap().body, "FIRST SECONDTHIRD");
    }

    #[test]
    fn literal_line_breaks_in_markup_are_dropped() {
        let doc = extract(&page(TABLE, "ONE&#x000A;\r\nTWO")).unwrap();
        assert_eq!(doc.body, "ONE\nTWO");
    }

    #[test]
    fn tabs_in_body_are_kept() {
        let doc = extract(&page(TABLE, "NAME\tPOST&#x000A;SMITH\tKABUL")).unwrap();
        assert_eq!(doc.body, "NAME\tPOST\nSMITH\tKABUL");
    }

    #[test]
    fn fewer_values_than_labels_truncates() {
        let table = "<table class='cable'><tr><th>A</th><th>B</th><th>C</th></tr>\
                     <tr><td><a href='x'>1</a></td><td><a href='y'>2</a></td><td>none</td></tr></table>";
        let doc = extract(&page(table, "text")).unwrap();
        assert_eq!(
            doc.headers,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn fewer_labels_than_values_truncates() {
        let table = "<table class='cable'><tr><th>A</th></tr>\
                     <tr><td><a href='x'>1</a><a href='y'>2</a></td></tr></table>";
        let doc = extract(&page(table, "text")).unwrap();
        assert_eq!(doc.headers, vec![("A".to_string(), "1".to_string())]);
    }

    #[test]
    fn uses_the_last_cable_table() {
        let first = "<table class='cable'><tr><th>Old</th></tr><tr><td><a href='x'>0</a></td></tr></table>";
        let html = page(&format!("{first}{TABLE}"), "text");
        let doc = extract(&html).unwrap();
        assert_eq!(doc.headers.len(), 4);
        assert_eq!(doc.headers[0].0, "Reference ID");
    }

    #[test]
    fn missing_header_table_is_a_parse_error() {
        let html = page("<table class='other'><tr><th>A</th></tr></table>", "text");
        assert!(matches!(extract(&html), Err(Error::Parse(_))));
    }

    #[test]
    fn missing_body_block_is_a_parse_error() {
        let html = format!("<html><body>{TABLE}<pre>not wrapped in code</pre></body></html>");
        assert!(matches!(extract(&html), Err(Error::Parse(_))));
    }
}
