//! HTTP client for the RCSB REST services
//!
//! Each method issues exactly one request (two for
//! [`RcsbClient::chains_with_sequences`]), awaits it, checks the status and
//! converts the body. Failures are logged where they are detected and returned;
//! nothing is retried.

use crate::api::endpoints;
use crate::config::RcsbConfig;
use crate::error::{CliError, Result};
use crate::formats::{self, FastaParse, MalformedFragment, SearchHits};
use crate::join::join_chains;
use pdbq_common::types::{ChainRecord, ChainWithSequence, FieldReport, SearchQuery, StructureDescription, StructureId};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Chains of one structure joined with their sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainsWithSequences {
    pub structure_id: StructureId,
    pub chains: Vec<ChainWithSequence>,
    /// FASTA fragments that were skipped while parsing
    pub malformed: Vec<MalformedFragment>,
}

/// API client for the RCSB PDB services
pub struct RcsbClient {
    client: Client,
    config: RcsbConfig,
}

impl RcsbClient {
    /// Create a client; the config is validated first
    pub fn new(config: RcsbConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RcsbConfig {
        &self.config
    }

    /// Underlying HTTP client, shared with the form driver
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// POST a query document and split the identifier list out of the reply
    #[instrument(skip(self), fields(kind = %query.kind))]
    pub async fn submit_query(&self, query: &SearchQuery) -> Result<SearchHits> {
        let payload = formats::query_to_xml(query);
        let url = &self.config.search_url;
        debug!(%payload, "Submitting search query");

        // The service reads the raw XML body despite the form content type
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(%url, status = status.as_u16(), "Search request failed");
            return Err(CliError::transport(url.as_str(), status));
        }

        let body = response.text().await?;
        let hits = formats::parse_search_response(&body).ok_or_else(|| {
            error!(%url, "Search returned an empty body");
            CliError::empty_response(url.as_str())
        })?;

        info!(hits = hits.len(), suspect = hits.suspect, "Search complete");
        Ok(hits)
    }

    /// Fetch a custom report for `ids` with the requested columns
    #[instrument(skip(self, ids, fields), fields(ids = ids.len(), columns = fields.len()))]
    pub async fn fetch_fields<F: AsRef<str>>(&self, ids: &[StructureId], fields: &[F]) -> Result<FieldReport> {
        if ids.is_empty() {
            return Err(CliError::invalid_input("at least one structure identifier is required"));
        }
        if fields.is_empty() || fields.iter().any(|f| f.as_ref().trim().is_empty()) {
            return Err(CliError::invalid_input("field names must be non-empty"));
        }

        let url = endpoints::report_url(&self.config.report_url, ids, fields)?;
        let body = self.get_text(url, "custom report").await?;
        let report = formats::parse_report_csv(&body)?;

        let requested: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
        if report.columns != requested {
            debug!(
                returned = ?report.columns,
                requested = ?requested,
                "Report columns differ from the requested fields"
            );
        }

        info!(rows = report.len(), "Fetched custom report");
        Ok(report)
    }

    /// Describe the polymers of one or more structures
    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    pub async fn describe_structures(&self, ids: &[StructureId]) -> Result<Vec<StructureDescription>> {
        if ids.is_empty() {
            return Err(CliError::invalid_input("at least one structure identifier is required"));
        }

        let url = endpoints::describe_url(&self.config.describe_url, ids)?;
        let body = self.get_text(url, "molecule description").await?;
        let structures = formats::parse_describe_mol(&body)?;

        debug!(structures = structures.len(), "Parsed molecule description");
        Ok(structures)
    }

    /// Chain records of a single structure
    pub async fn describe_chains(&self, id: &StructureId) -> Result<Vec<ChainRecord>> {
        let structures = self.describe_structures(std::slice::from_ref(id)).await?;

        match structures
            .into_iter()
            .find(|s| s.structure_id.eq_ignore_ascii_case(id.as_str()))
        {
            Some(structure) => Ok(structure.chains),
            None => {
                warn!(structure = %id, "Molecule description has no entry for structure");
                Ok(Vec::new())
            },
        }
    }

    /// Download and parse the FASTA sequences of a structure
    #[instrument(skip(self), fields(structure = %id))]
    pub async fn fetch_sequences(&self, id: &StructureId) -> Result<FastaParse> {
        let url = endpoints::fasta_url(&self.config.fasta_url, id.as_str())?;
        let body = self.get_text(url, "FASTA download").await?;
        Ok(formats::parse_fasta(&body))
    }

    /// Describe a structure and attach each chain's sequence
    pub async fn chains_with_sequences(&self, id: &StructureId) -> Result<ChainsWithSequences> {
        let chains = self.describe_chains(id).await?;
        let sequences = self.fetch_sequences(id).await?;

        let joined = join_chains(&chains, &sequences.records);
        let unmatched = joined.iter().filter(|c| c.sequence.is_none()).count();
        if unmatched > 0 {
            debug!(structure = %id, unmatched, "Chains without a sequence");
        }

        Ok(ChainsWithSequences {
            structure_id: id.clone(),
            chains: joined,
            malformed: sequences.malformed,
        })
    }

    async fn get_text(&self, url: Url, what: &str) -> Result<String> {
        debug!(%url, "GET {}", what);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!(%url, status = status.as_u16(), "{} request failed", what);
            return Err(CliError::transport(url.as_str(), status));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            error!(%url, "{} returned an empty body", what);
            return Err(CliError::empty_response(url.as_str()));
        }

        Ok(body)
    }
}
