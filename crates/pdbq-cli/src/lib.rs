//! pdbq CLI Library
//!
//! Command-line client for the legacy RCSB Protein Data Bank REST services.
//!
//! # Overview
//!
//! - **Search**: submit a structured query and list matching identifiers (`pdbq search`)
//! - **Reports**: fetch selected fields for a set of structures (`pdbq report`)
//! - **Descriptions**: list the polymer chains of structures (`pdbq describe`)
//! - **Sequences**: join each chain with its FASTA sequence (`pdbq sequences`)
//! - **Web form**: drive the advanced search page directly (`pdbq web-search`)
//!
//! The same operations are available as a library through [`api::RcsbClient`].

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod formats;
pub mod join;
pub mod output;
pub mod progress;
pub mod web_form;

// Re-export commonly used types
pub use api::RcsbClient;
pub use config::RcsbConfig;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use output::{DescribeFormat, ReportFormat, SearchFormat, SequenceFormat};
use pdbq_common::types::{Comparator, QueryKind};
use std::path::PathBuf;

/// pdbq - query the RCSB Protein Data Bank
#[derive(Parser, Debug)]
#[command(name = "pdbq")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML)
    #[arg(long, env = "PDBQ_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Send every request to this server instead of the configured hosts
    #[arg(long, env = "PDBQ_BASE_URL", global = true)]
    pub base_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for structures and print their identifiers
    Search {
        /// Text to search for
        value: String,

        /// Field to search (title, description, keyword)
        #[arg(short, long, default_value = "title")]
        kind: QueryKind,

        /// How the value is matched (contains, equals)
        #[arg(short, long, default_value = "contains")]
        comparator: Comparator,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = SearchFormat::Plain)]
        format: SearchFormat,
    },

    /// Fetch selected report fields for one or more structures
    Report {
        /// Structure identifiers (e.g. 5JUP)
        #[arg(required = true)]
        ids: Vec<String>,

        /// Comma-separated report columns (e.g. structureId,resolution)
        #[arg(long, required = true, value_delimiter = ',')]
        fields: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// List the polymer chains of one or more structures
    Describe {
        /// Structure identifiers
        #[arg(required = true)]
        ids: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = DescribeFormat::Table)]
        format: DescribeFormat,
    },

    /// Show each chain of a structure with its sequence
    Sequences {
        /// Structure identifier
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = SequenceFormat::Table)]
        format: SequenceFormat,
    },

    /// Submit a search through the advanced search web form
    WebSearch {
        /// Text to search for
        value: String,

        /// Field to search (title, description, keyword)
        #[arg(short, long, default_value = "title")]
        kind: QueryKind,

        /// How the value is matched (contains, equals)
        #[arg(short, long, default_value = "contains")]
        comparator: Comparator,

        /// Give up waiting for a form control after this many milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,

        /// Interval between control checks in milliseconds
        #[arg(long, default_value_t = 100)]
        poll_ms: u64,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_fields() {
        let cli = Cli::try_parse_from([
            "pdbq",
            "report",
            "5JUP",
            "5JUU",
            "--fields",
            "structureId,resolution",
            "--format",
            "csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Report { ids, fields, format } => {
                assert_eq!(ids, vec!["5JUP", "5JUU"]);
                assert_eq!(fields, vec!["structureId", "resolution"]);
                assert_eq!(format, ReportFormat::Csv);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_search_kind() {
        let cli = Cli::try_parse_from(["pdbq", "search", "actin", "--kind", "keyword", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Search { value, kind, comparator, .. } => {
                assert_eq!(value, "actin");
                assert_eq!(kind, QueryKind::AdvancedKeyword);
                assert_eq!(comparator, Comparator::Contains);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["pdbq", "search", "actin", "--kind", "sequence"]).is_err());
    }
}
