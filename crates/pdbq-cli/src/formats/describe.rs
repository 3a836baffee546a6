//! describeMol XML parsing
//!
//! Document shape:
//!
//! ```xml
//! <molDescription>
//!   <structureId id="4HHB">
//!     <polymer entityNr="1" length="141" type="protein">
//!       <chain id="A"/>
//!       <chain id="C"/>
//!       <Taxonomy name="Homo sapiens" id="9606"/>
//!       <macroMolecule name="Hemoglobin subunit alpha"><accession id="P69905"/></macroMolecule>
//!       <polymerDescription description="HEMOGLOBIN (DEOXY) (ALPHA CHAIN)"/>
//!     </polymer>
//!   </structureId>
//! </molDescription>
//! ```
//!
//! Each `chain` child of a polymer becomes its own [`ChainRecord`] carrying the
//! polymer's first macromolecule name, taxonomy and description. Missing
//! children give empty strings.

use crate::error::{CliError, Result};
use pdbq_common::types::{ChainRecord, StructureDescription};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MolDescription {
    #[serde(rename = "structureId", default)]
    structures: Vec<StructureNode>,
}

#[derive(Debug, Deserialize)]
struct StructureNode {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "polymer", default)]
    polymers: Vec<PolymerNode>,
}

#[derive(Debug, Deserialize)]
struct PolymerNode {
    #[serde(rename = "chain", default)]
    chains: Vec<ChainNode>,
    #[serde(rename = "Taxonomy", default)]
    taxonomy: Vec<NamedNode>,
    #[serde(rename = "macroMolecule", default)]
    macromolecules: Vec<NamedNode>,
    #[serde(rename = "polymerDescription", default)]
    descriptions: Vec<DescriptionNode>,
}

#[derive(Debug, Deserialize)]
struct ChainNode {
    #[serde(rename = "@id", default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct NamedNode {
    #[serde(rename = "@name", default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct DescriptionNode {
    #[serde(rename = "@description", default)]
    description: String,
}

impl PolymerNode {
    fn into_records(self) -> Vec<ChainRecord> {
        let template = ChainRecord {
            chain_id: String::new(),
            macromolecule: first_or_empty(self.macromolecules, |n| n.name),
            taxonomy: first_or_empty(self.taxonomy, |n| n.name),
            description: first_or_empty(self.descriptions, |d| d.description),
        };

        if self.chains.is_empty() {
            return vec![template];
        }

        self.chains
            .into_iter()
            .map(|chain| ChainRecord {
                chain_id: chain.id,
                ..template.clone()
            })
            .collect()
    }
}

fn first_or_empty<T>(nodes: Vec<T>, field: impl FnOnce(T) -> String) -> String {
    nodes.into_iter().next().map(field).unwrap_or_default()
}

/// Parse a describeMol document into one description per `structureId`
pub fn parse_describe_mol(xml: &str) -> Result<Vec<StructureDescription>> {
    let doc: MolDescription = quick_xml::de::from_str(xml)
        .map_err(|e| CliError::malformed(format!("describeMol XML: {}", e)))?;

    Ok(doc
        .structures
        .into_iter()
        .map(|structure| StructureDescription {
            structure_id: structure.id,
            chains: structure
                .polymers
                .into_iter()
                .flat_map(PolymerNode::into_records)
                .collect(),
        })
        .collect())
}
