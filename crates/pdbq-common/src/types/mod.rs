//! Record types shared across pdbq
//!
//! Everything here is created per call and never mutated afterwards.

use crate::error::{PdbqError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a PDB structure identifier
pub const STRUCTURE_ID_LEN: usize = 4;

// ============================================================================
// Structure identifiers
// ============================================================================

/// A 4-character alphanumeric PDB entry code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StructureId(String);

impl StructureId {
    /// Validate and normalize an identifier
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.len() != STRUCTURE_ID_LEN || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(PdbqError::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StructureId {
    type Err = PdbqError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for StructureId {
    type Error = PdbqError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<StructureId> for String {
    fn from(id: StructureId) -> Self {
        id.0
    }
}

impl AsRef<str> for StructureId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Search queries
// ============================================================================

/// Legacy RCSB simple query types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Match against the structure title
    #[default]
    StructTitle,
    /// Match against the entity (polymer) description
    StructDesc,
    /// Free-text keyword search
    AdvancedKeyword,
}

impl QueryKind {
    /// Short subtype name used by the search form and the query description
    pub fn subtype(self) -> &'static str {
        match self {
            QueryKind::StructTitle => "StructTitleQuery",
            QueryKind::StructDesc => "StructDescQuery",
            QueryKind::AdvancedKeyword => "AdvancedKeywordQuery",
        }
    }

    /// Fully qualified `queryType` value
    pub fn query_type(self) -> String {
        format!("org.pdb.query.simple.{}", self.subtype())
    }

    /// Element name prefix for the comparator/value pair.
    ///
    /// Keyword queries carry a single `keywords` element instead.
    pub fn field_prefix(self) -> Option<&'static str> {
        match self {
            QueryKind::StructTitle => Some("struct.title"),
            QueryKind::StructDesc => Some("entity.pdbx_description"),
            QueryKind::AdvancedKeyword => None,
        }
    }
}

impl FromStr for QueryKind {
    type Err = PdbqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "title" | "structtitle" | "struct-title" => Ok(QueryKind::StructTitle),
            "description" | "desc" | "structdesc" | "struct-desc" => Ok(QueryKind::StructDesc),
            "keyword" | "keywords" | "advancedkeyword" => Ok(QueryKind::AdvancedKeyword),
            _ => Err(PdbqError::UnknownQueryKind(s.to_string())),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::StructTitle => write!(f, "title"),
            QueryKind::StructDesc => write!(f, "description"),
            QueryKind::AdvancedKeyword => write!(f, "keyword"),
        }
    }
}

/// Text comparator for title/description queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    #[default]
    Contains,
    Equals,
}

impl FromStr for Comparator {
    type Err = PdbqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "contains" => Ok(Comparator::Contains),
            "equals" | "exact" => Ok(Comparator::Equals),
            _ => Err(PdbqError::UnknownComparator(s.to_string())),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Contains => write!(f, "contains"),
            Comparator::Equals => write!(f, "equals"),
        }
    }
}

/// A single search specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub kind: QueryKind,
    #[serde(default)]
    pub comparator: Comparator,
    pub value: String,
}

impl SearchQuery {
    pub fn new(kind: QueryKind, comparator: Comparator, value: impl Into<String>) -> Self {
        Self {
            kind,
            comparator,
            value: value.into(),
        }
    }

    /// Title-contains query, the most common search
    pub fn title_contains(value: impl Into<String>) -> Self {
        Self::new(QueryKind::StructTitle, Comparator::Contains, value)
    }
}

// ============================================================================
// Field reports
// ============================================================================

/// A single cell of a custom report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Empty => Ok(()),
        }
    }
}

/// Inferred type of a report column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

/// Tabular result of a custom report request
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldReport {
    pub columns: Vec<String>,
    pub column_types: Vec<ColumnType>,
    pub rows: Vec<Vec<FieldValue>>,
}

impl FieldReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow one row as a name-addressable view
    pub fn row(&self, index: usize) -> Option<FieldReportRow<'_>> {
        self.rows.get(index).map(|values| FieldReportRow {
            columns: &self.columns,
            values,
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = FieldReportRow<'_>> {
        self.rows.iter().map(|values| FieldReportRow {
            columns: &self.columns,
            values,
        })
    }

    /// Position of a column, if the report has it
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// A row of a [`FieldReport`], addressed by field name
#[derive(Debug, Clone, Copy)]
pub struct FieldReportRow<'a> {
    columns: &'a [String],
    values: &'a [FieldValue],
}

impl<'a> FieldReportRow<'a> {
    pub fn get(&self, field: &str) -> Option<&'a FieldValue> {
        self.columns
            .iter()
            .position(|c| c == field)
            .and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &'a [FieldValue] {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a FieldValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

// ============================================================================
// Chains and sequences
// ============================================================================

/// One polymer chain from a molecule description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainRecord {
    pub chain_id: String,
    pub macromolecule: String,
    pub taxonomy: String,
    pub description: String,
}

/// All chains described for one structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructureDescription {
    pub structure_id: String,
    pub chains: Vec<ChainRecord>,
}

/// One chain's sequence from a FASTA download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub chain_id: String,
    pub sequence: String,
}

/// A chain left-joined with its sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainWithSequence {
    #[serde(flatten)]
    pub chain: ChainRecord,
    pub sequence: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_id_normalizes_case() {
        let id = StructureId::new("5jup").unwrap();
        assert_eq!(id.as_str(), "5JUP");
        assert_eq!(id.to_string(), "5JUP");
    }

    #[test]
    fn test_structure_id_rejects_bad_length() {
        assert!(StructureId::new("5JU").is_err());
        assert!(StructureId::new("5JUPX").is_err());
        assert!(StructureId::new("").is_err());
    }

    #[test]
    fn test_structure_id_rejects_punctuation() {
        assert_eq!(
            StructureId::new("5J-P"),
            Err(PdbqError::InvalidIdentifier("5J-P".to_string()))
        );
    }

    #[test]
    fn test_structure_id_serde() {
        let id: StructureId = serde_json::from_str("\"1abc\"").unwrap();
        assert_eq!(id.as_str(), "1ABC");
        assert!(serde_json::from_str::<StructureId>("\"toolong\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1ABC\"");
    }

    #[test]
    fn test_query_kind_from_str() {
        assert_eq!("title".parse::<QueryKind>().unwrap(), QueryKind::StructTitle);
        assert_eq!("Description".parse::<QueryKind>().unwrap(), QueryKind::StructDesc);
        assert_eq!("keyword".parse::<QueryKind>().unwrap(), QueryKind::AdvancedKeyword);
        assert!("sequence".parse::<QueryKind>().is_err());
    }

    #[test]
    fn test_query_kind_names() {
        assert_eq!(
            QueryKind::StructTitle.query_type(),
            "org.pdb.query.simple.StructTitleQuery"
        );
        assert_eq!(QueryKind::StructTitle.field_prefix(), Some("struct.title"));
        assert_eq!(QueryKind::AdvancedKeyword.field_prefix(), None);
    }

    #[test]
    fn test_comparator_from_str() {
        assert_eq!("contains".parse::<Comparator>().unwrap(), Comparator::Contains);
        assert_eq!("EQUALS".parse::<Comparator>().unwrap(), Comparator::Equals);
        assert!("startswith".parse::<Comparator>().is_err());
    }

    #[test]
    fn test_report_row_lookup() {
        let report = FieldReport {
            columns: vec!["structureId".into(), "resolution".into()],
            column_types: vec![ColumnType::Text, ColumnType::Float],
            rows: vec![vec![FieldValue::Text("5JUP".into()), FieldValue::Float(3.5)]],
        };

        let row = report.row(0).unwrap();
        assert_eq!(row.get("resolution"), Some(&FieldValue::Float(3.5)));
        assert_eq!(row.get("missing"), None);
        assert!(report.row(1).is_none());
        assert_eq!(report.column_index("resolution"), Some(1));
    }

    #[test]
    fn test_field_value_json_is_untagged() {
        let values = vec![
            FieldValue::Integer(3),
            FieldValue::Float(2.5),
            FieldValue::Text("X-RAY".into()),
            FieldValue::Empty,
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[3,2.5,"X-RAY",null]"#
        );
    }

    #[test]
    fn test_chain_with_sequence_flattens() {
        let joined = ChainWithSequence {
            chain: ChainRecord {
                chain_id: "A".into(),
                ..Default::default()
            },
            sequence: None,
        };
        let json = serde_json::to_value(&joined).unwrap();
        assert_eq!(json["chain_id"], "A");
        assert!(json["sequence"].is_null());
    }
}
