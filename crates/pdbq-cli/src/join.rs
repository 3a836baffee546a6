//! Chain metadata joined with sequences

use pdbq_common::types::{ChainRecord, ChainWithSequence, SequenceRecord};
use std::collections::HashMap;

/// Left outer join of chains and sequences on chain id.
///
/// Every chain appears once, in its original order. Sequences with no chain
/// are dropped; if several sequences share a chain id the first one is used.
pub fn join_chains(chains: &[ChainRecord], sequences: &[SequenceRecord]) -> Vec<ChainWithSequence> {
    let mut by_chain: HashMap<&str, &str> = HashMap::with_capacity(sequences.len());
    for record in sequences {
        by_chain
            .entry(record.chain_id.as_str())
            .or_insert(record.sequence.as_str());
    }

    chains
        .iter()
        .map(|chain| ChainWithSequence {
            chain: chain.clone(),
            sequence: by_chain.get(chain.chain_id.as_str()).map(|s| s.to_string()),
        })
        .collect()
}
