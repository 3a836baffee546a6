//! `pdbq web-search` command implementation
//!
//! Submits a query through the advanced search web form instead of the REST
//! search service.

use crate::api::RcsbClient;
use crate::config::RcsbConfig;
use crate::error::{CliError, Result};
use crate::progress::with_spinner;
use crate::web_form::{submit_structure_search, FormConfig, HttpFormDriver, WaitPolicy};
use colored::Colorize;
use pdbq_common::types::{Comparator, QueryKind, SearchQuery};
use std::time::Duration;

/// Fill in and submit the search form, then print where it led
pub async fn run(
    config: RcsbConfig,
    value: String,
    kind: QueryKind,
    comparator: Comparator,
    timeout_ms: u64,
    poll_ms: u64,
) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CliError::invalid_input("search value cannot be empty"));
    }
    if poll_ms == 0 {
        return Err(CliError::invalid_input("poll interval must be greater than 0"));
    }

    let policy = WaitPolicy {
        timeout: Duration::from_millis(timeout_ms),
        poll_interval: Duration::from_millis(poll_ms),
    };
    let form = FormConfig::new(config.web_search_url.clone());
    let query = SearchQuery::new(kind, comparator, value);

    let client = RcsbClient::new(config)?;
    let mut driver = HttpFormDriver::new(client.http().clone());

    let outcome = with_spinner(
        "Submitting search form...",
        submit_structure_search(&mut driver, &form, &policy, &query),
    )
    .await?;

    println!("{} {}", "Results:".green().bold(), outcome.url);
    println!("Status:  {}", outcome.status);
    Ok(())
}
