//! Search query payloads and search responses
//!
//! The legacy search service takes an `orgPdbQuery` XML document and answers
//! with one structure identifier per line.

use pdbq_common::types::{SearchQuery, StructureId, STRUCTURE_ID_LEN};
use quick_xml::escape::escape;
use serde::Serialize;
use tracing::warn;

/// Serialize a query to the service's `orgPdbQuery` dialect
pub fn query_to_xml(query: &SearchQuery) -> String {
    let subtype = query.kind.subtype();
    let value = escape(query.value.as_str());

    let mut xml = String::from("<orgPdbQuery>\n");
    xml.push_str(&format!("<queryType>{}</queryType>\n", query.kind.query_type()));

    match query.kind.field_prefix() {
        Some(prefix) => {
            let comparator = query.comparator.to_string();
            xml.push_str(&format!(
                "<description>{}: {}.comparator={} {}.value={}</description>\n",
                subtype, prefix, comparator, prefix, value
            ));
            xml.push_str(&format!(
                "<{p}.comparator>{}</{p}.comparator>\n",
                comparator,
                p = prefix
            ));
            xml.push_str(&format!("<{p}.value>{}</{p}.value>\n", value, p = prefix));
        },
        None => {
            xml.push_str(&format!(
                "<description>{}: keywords={}</description>\n",
                subtype, value
            ));
            xml.push_str(&format!("<keywords>{}</keywords>\n", value));
        },
    }

    xml.push_str("</orgPdbQuery>\n");
    xml
}

/// Tokens returned by a search, as received
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchHits {
    /// One entry per non-blank response line, trimmed
    pub tokens: Vec<String>,

    /// Set when the first token does not look like a structure identifier
    pub suspect: bool,
}

impl SearchHits {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens that are valid structure identifiers, in response order
    pub fn identifiers(&self) -> Vec<StructureId> {
        self.tokens
            .iter()
            .filter_map(|t| StructureId::new(t).ok())
            .collect()
    }
}

/// Split a newline-delimited search response.
///
/// Returns `None` for a body with no tokens.
pub fn parse_search_response(body: &str) -> Option<SearchHits> {
    let tokens: Vec<String> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let first = tokens.first()?;
    let suspect = first.chars().count() != STRUCTURE_ID_LEN;
    if suspect {
        warn!(
            first_token = %first,
            tokens = tokens.len(),
            "Search response does not start with a structure identifier"
        );
    }

    Some(SearchHits { tokens, suspect })
}
