//! Conversions between RCSB wire formats and pdbq records
//!
//! All functions here are pure; fetching lives in [`crate::api`].

pub mod describe;
pub mod fasta;
pub mod query;
pub mod report;

pub use describe::parse_describe_mol;
pub use fasta::{parse_fasta, FastaParse, MalformedFragment};
pub use query::{parse_search_response, query_to_xml, SearchHits};
pub use report::parse_report_csv;
