//! FASTA sequence parsing
//!
//! RCSB headers look like `>5JUP:A|PDBID|CHAIN|SEQUENCE`. The chain id is the
//! second `:`-separated segment of the text before the first `|`. A fragment
//! whose header does not fit that shape is skipped and reported; the rest of
//! the file still parses.

use pdbq_common::types::SequenceRecord;
use serde::Serialize;
use tracing::{debug, warn};

/// Line width used when writing sequences back out
pub const FASTA_LINE_WIDTH: usize = 80;

/// A `>` fragment that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedFragment {
    /// Zero-based position among the `>` fragments
    pub index: usize,
    pub header: String,
    pub reason: String,
}

/// Records parsed from a FASTA body plus the fragments that were skipped
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FastaParse {
    pub records: Vec<SequenceRecord>,
    pub malformed: Vec<MalformedFragment>,
}

impl FastaParse {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

/// Split FASTA text into chain/sequence records.
///
/// Text before the first `>` is ignored, so empty input or input without any
/// marker yields no records.
pub fn parse_fasta(text: &str) -> FastaParse {
    let mut parsed = FastaParse::default();

    for (index, fragment) in text.split('>').skip(1).enumerate() {
        let mut lines = fragment.lines().map(|l| l.trim_end_matches('\r'));
        let header = lines.next().unwrap_or_default().trim();

        match chain_id_from_header(header) {
            Ok(chain_id) => {
                let sequence: String = lines.map(str::trim).collect();
                parsed.records.push(SequenceRecord {
                    chain_id: chain_id.to_string(),
                    sequence,
                });
            },
            Err(reason) => {
                warn!(index, header, reason, "Skipping malformed FASTA fragment");
                parsed.malformed.push(MalformedFragment {
                    index,
                    header: header.to_string(),
                    reason: reason.to_string(),
                });
            },
        }
    }

    debug!(
        records = parsed.records.len(),
        malformed = parsed.malformed.len(),
        "Parsed FASTA"
    );
    parsed
}

fn chain_id_from_header(header: &str) -> std::result::Result<&str, &'static str> {
    let (prefix, _) = header.split_once('|').ok_or("header has no '|'")?;
    let chain = prefix
        .split(':')
        .nth(1)
        .ok_or("header has no ':' before the first '|'")?
        .trim();
    if chain.is_empty() {
        return Err("header has an empty chain id");
    }
    Ok(chain)
}

/// Render records as FASTA with RCSB-style headers
pub fn write_fasta(structure_id: &str, records: &[SequenceRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            ">{}:{}|PDBID|CHAIN|SEQUENCE\n",
            structure_id, record.chain_id
        ));
        let bytes = record.sequence.as_bytes();
        for line in bytes.chunks(FASTA_LINE_WIDTH) {
            out.push_str(&String::from_utf8_lossy(line));
            out.push('\n');
        }
    }
    out
}
