//! `pdbq report` command implementation

use crate::api::RcsbClient;
use crate::commands::parse_ids;
use crate::config::RcsbConfig;
use crate::error::Result;
use crate::output::{self, ReportFormat};
use crate::progress::with_spinner;

/// Fetch a custom report and print it
pub async fn run(config: RcsbConfig, ids: Vec<String>, fields: Vec<String>, format: ReportFormat) -> Result<()> {
    let ids = parse_ids(&ids)?;
    let client = RcsbClient::new(config)?;

    let report = with_spinner("Fetching report...", client.fetch_fields(&ids, &fields)).await?;

    if report.is_empty() && format == ReportFormat::Table {
        eprintln!("No rows returned.");
        return Ok(());
    }

    print!("{}", output::render_report(&report, format)?);
    Ok(())
}
