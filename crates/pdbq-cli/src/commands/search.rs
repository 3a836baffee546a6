//! `pdbq search` command implementation

use crate::api::RcsbClient;
use crate::config::RcsbConfig;
use crate::error::{CliError, Result};
use crate::output::{self, SearchFormat};
use crate::progress::with_spinner;
use colored::Colorize;
use pdbq_common::types::{Comparator, QueryKind, SearchQuery};
use tracing::debug;

/// Run a structure search and print the returned identifiers
pub async fn run(
    config: RcsbConfig,
    value: String,
    kind: QueryKind,
    comparator: Comparator,
    format: SearchFormat,
) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CliError::invalid_input("search value cannot be empty"));
    }

    let query = SearchQuery::new(kind, comparator, value);
    debug!(?query, "Starting search");

    let client = RcsbClient::new(config)?;
    let hits = with_spinner("Searching RCSB PDB...", client.submit_query(&query)).await?;

    if hits.suspect {
        eprintln!(
            "{} response does not look like a list of structure identifiers",
            "warning:".yellow().bold()
        );
    }

    match format {
        SearchFormat::Plain => print!("{}", output::render_hits_plain(&hits)),
        SearchFormat::Json => println!("{}", output::render_hits_json(&hits)?),
    }

    Ok(())
}
