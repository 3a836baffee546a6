//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function. Results go to
//! stdout; diagnostics go to stderr and the log.

pub mod describe;
pub mod report;
pub mod search;
pub mod sequences;
pub mod web_search;

use crate::error::{CliError, Result};
use pdbq_common::types::StructureId;

/// Parse identifiers given on the command line, failing on the first bad one
pub(crate) fn parse_ids<S: AsRef<str>>(raw: &[S]) -> Result<Vec<StructureId>> {
    raw.iter()
        .map(|id| StructureId::new(id.as_ref()).map_err(CliError::from))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_normalizes() {
        let ids = parse_ids(&["5jup", " 4HHB "]).unwrap();
        let ids: Vec<&str> = ids.iter().map(StructureId::as_str).collect();
        assert_eq!(ids, vec!["5JUP", "4HHB"]);
    }

    #[test]
    fn test_parse_ids_rejects_bad_id() {
        let result = parse_ids(&["5JUP", "TOOLONG"]);
        assert!(matches!(result, Err(CliError::Model(_))));
    }
}
