//! `pdbq sequences` command implementation
//!
//! Describes a structure, downloads its FASTA file and prints each chain with
//! its sequence.

use crate::api::RcsbClient;
use crate::config::RcsbConfig;
use crate::error::Result;
use crate::output::{self, SequenceFormat};
use crate::progress::with_spinner;
use colored::Colorize;
use pdbq_common::types::StructureId;
use tracing::warn;

/// Print the chains of a structure joined with their sequences
pub async fn run(config: RcsbConfig, id: String, format: SequenceFormat) -> Result<()> {
    let id = StructureId::new(&id)?;
    let client = RcsbClient::new(config)?;

    let joined = with_spinner("Fetching chains and sequences...", client.chains_with_sequences(&id)).await?;

    for fragment in &joined.malformed {
        warn!(
            structure = %id,
            index = fragment.index,
            header = %fragment.header,
            reason = %fragment.reason,
            "Skipped malformed FASTA record"
        );
        eprintln!(
            "{} skipped FASTA record {} ({}): {}",
            "warning:".yellow().bold(),
            fragment.index,
            fragment.header,
            fragment.reason
        );
    }

    if joined.chains.is_empty() && format == SequenceFormat::Table {
        eprintln!("No chains described for {}.", id);
        return Ok(());
    }

    let rendered = output::render_sequences(&joined, format)?;
    match format {
        SequenceFormat::Table => {
            println!("{}", output::heading(&format!("Chains of {}", id)));
            print!("{}", rendered);
        },
        SequenceFormat::Fasta => print!("{}", rendered),
        SequenceFormat::Json => println!("{}", rendered),
    }
    Ok(())
}
