//! Rendering of command results
//!
//! Every renderer returns a `String`; commands decide where it goes.

use crate::api::ChainsWithSequences;
use crate::error::{CliError, Result};
use crate::formats::fasta::write_fasta;
use crate::formats::SearchHits;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use pdbq_common::types::{FieldReport, SequenceRecord, StructureDescription};

/// Widest sequence shown in a table cell
const SEQUENCE_PREVIEW: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchFormat {
    /// One identifier per line
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DescribeFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SequenceFormat {
    #[default]
    Table,
    Json,
    Fasta,
}

/// Bold cyan section heading
pub fn heading(text: &str) -> String {
    text.cyan().bold().to_string()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
    table
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

pub fn render_hits_plain(hits: &SearchHits) -> String {
    let mut out = String::new();
    for token in &hits.tokens {
        out.push_str(token);
        out.push('\n');
    }
    out
}

pub fn render_hits_json(hits: &SearchHits) -> Result<String> {
    Ok(serde_json::to_string_pretty(hits)?)
}

pub fn render_report(report: &FieldReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => Ok(render_report_table(report)),
        ReportFormat::Json => render_report_json(report),
        ReportFormat::Csv => render_report_csv(report),
    }
}

fn render_report_table(report: &FieldReport) -> String {
    let mut table = new_table();
    table.set_header(&report.columns);
    for row in &report.rows {
        table.add_row(row.iter().map(ToString::to_string).collect::<Vec<_>>());
    }
    format!("{}\n", table)
}

/// One JSON object per row, keyed by column name; empty cells become `null`
fn render_report_json(report: &FieldReport) -> Result<String> {
    let rows = report
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|(name, value)| -> Result<(String, serde_json::Value)> {
                    Ok((name.to_string(), serde_json::to_value(value)?))
                })
                .collect::<Result<serde_json::Map<_, _>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_string_pretty(&rows)?)
}

fn render_report_csv(report: &FieldReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&report.columns)?;
    for row in &report.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| CliError::malformed(format!("report is not UTF-8: {}", e)))
}

pub fn render_descriptions(structures: &[StructureDescription], format: DescribeFormat) -> Result<String> {
    match format {
        DescribeFormat::Json => Ok(serde_json::to_string_pretty(structures)?),
        DescribeFormat::Table => {
            let mut table = new_table();
            table.set_header(vec!["Structure", "Chain", "Macromolecule", "Taxonomy", "Description"]);
            for structure in structures {
                for chain in &structure.chains {
                    table.add_row(vec![
                        structure.structure_id.as_str(),
                        chain.chain_id.as_str(),
                        chain.macromolecule.as_str(),
                        chain.taxonomy.as_str(),
                        chain.description.as_str(),
                    ]);
                }
            }
            Ok(format!("{}\n", table))
        },
    }
}

pub fn render_sequences(joined: &ChainsWithSequences, format: SequenceFormat) -> Result<String> {
    match format {
        SequenceFormat::Json => Ok(serde_json::to_string_pretty(joined)?),
        SequenceFormat::Fasta => {
            let records: Vec<SequenceRecord> = joined
                .chains
                .iter()
                .filter_map(|c| {
                    c.sequence.as_ref().map(|sequence| SequenceRecord {
                        chain_id: c.chain.chain_id.clone(),
                        sequence: sequence.clone(),
                    })
                })
                .collect();
            Ok(write_fasta(joined.structure_id.as_str(), &records))
        },
        SequenceFormat::Table => {
            let mut table = new_table();
            table.set_header(vec!["Chain", "Macromolecule", "Taxonomy", "Length", "Sequence"]);
            for c in &joined.chains {
                let (length, preview) = match &c.sequence {
                    Some(seq) => (seq.chars().count().to_string(), truncate_chars(seq, SEQUENCE_PREVIEW)),
                    None => ("-".to_string(), "-".to_string()),
                };
                table.add_row(vec![
                    c.chain.chain_id.clone(),
                    c.chain.macromolecule.clone(),
                    c.chain.taxonomy.clone(),
                    length,
                    preview,
                ]);
            }
            Ok(format!("{}\n", table))
        },
    }
}
