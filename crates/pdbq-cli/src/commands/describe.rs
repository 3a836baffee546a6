//! `pdbq describe` command implementation

use crate::api::RcsbClient;
use crate::commands::parse_ids;
use crate::config::RcsbConfig;
use crate::error::Result;
use crate::output::{self, DescribeFormat};
use crate::progress::with_spinner;
use tracing::warn;

/// Print the polymer chains of one or more structures
pub async fn run(config: RcsbConfig, ids: Vec<String>, format: DescribeFormat) -> Result<()> {
    let ids = parse_ids(&ids)?;
    let client = RcsbClient::new(config)?;

    let structures = with_spinner("Describing structures...", client.describe_structures(&ids)).await?;

    for id in &ids {
        if !structures.iter().any(|s| s.structure_id.eq_ignore_ascii_case(id.as_str())) {
            warn!(structure = %id, "No description returned");
        }
    }

    let rendered = output::render_descriptions(&structures, format)?;
    match format {
        DescribeFormat::Table => print!("{}", rendered),
        DescribeFormat::Json => println!("{}", rendered),
    }
    Ok(())
}
