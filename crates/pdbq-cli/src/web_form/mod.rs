//! Driving the RCSB advanced search web form
//!
//! The form is reached through a [`FormDriver`]: something that can open a
//! page, report whether a control is usable, set values and press buttons.
//! Between steps the search procedure waits for the next control to become
//! interactable ([`wait_for_control`]) instead of sleeping a fixed amount.

pub mod http_driver;

pub use http_driver::HttpFormDriver;

use crate::error::{CliError, Result};
use async_trait::async_trait;
use pdbq_common::types::SearchQuery;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Observable state of a form control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Not in the current page
    Absent,
    /// In the page but disabled or hidden
    Present,
    /// Can receive input
    Interactable,
}

/// Page reached after submitting a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOutcome {
    pub url: String,
    pub status: u16,
}

/// A page automation backend
#[async_trait]
pub trait FormDriver: Send {
    /// Navigate to `url`, replacing the current page
    async fn open(&mut self, url: &str) -> Result<()>;

    async fn control_state(&mut self, control: &str) -> Result<ControlState>;

    /// Choose the option with `value` in a select control
    async fn select_option(&mut self, control: &str, value: &str) -> Result<()>;

    /// Set the text of an input or textarea
    async fn type_text(&mut self, control: &str, text: &str) -> Result<()>;

    /// Press a submit control
    async fn click(&mut self, control: &str) -> Result<FormOutcome>;
}

/// How long and how often to poll for a control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Poll until `control` is interactable.
///
/// Fails with [`CliError::FormControlNotFound`] if the control never showed up
/// and [`CliError::WaitTimeout`] if it showed up but stayed unusable.
pub async fn wait_for_control<D>(driver: &mut D, control: &str, policy: &WaitPolicy) -> Result<()>
where
    D: FormDriver + ?Sized,
{
    let started = tokio::time::Instant::now();

    loop {
        let state = driver.control_state(control).await?;
        if state == ControlState::Interactable {
            debug!(control, waited_ms = started.elapsed().as_millis() as u64, "Control ready");
            return Ok(());
        }

        let waited = started.elapsed();
        if waited >= policy.timeout {
            return Err(match state {
                ControlState::Absent => CliError::FormControlNotFound(control.to_string()),
                _ => CliError::WaitTimeout {
                    control: control.to_string(),
                    waited_ms: waited.as_millis() as u64,
                },
            });
        }

        trace!(control, ?state, "Waiting for control");
        tokio::time::sleep(policy.poll_interval).await;
    }
}

/// Element ids of the advanced search form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub page_url: String,
    /// Query subtype dropdown
    pub subtype_control: String,
    pub submit_control: String,
    /// Suffix of the first criteria row's controls
    pub row_suffix: String,
}

impl FormConfig {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            subtype_control: "smartSearchSubtype_0".to_string(),
            submit_control: "doSearch".to_string(),
            row_suffix: "_0".to_string(),
        }
    }

    /// Text input that receives the query value
    pub fn value_control(&self, query: &SearchQuery) -> String {
        match query.kind.field_prefix() {
            Some(prefix) => format!("{}.value{}", prefix, self.row_suffix),
            None => format!("keywords{}", self.row_suffix),
        }
    }

    /// Comparator dropdown, for kinds that have one
    pub fn comparator_control(&self, query: &SearchQuery) -> Option<String> {
        query
            .kind
            .field_prefix()
            .map(|prefix| format!("{}.comparator{}", prefix, self.row_suffix))
    }
}

/// Fill in and submit the advanced search form for `query`
pub async fn submit_structure_search<D>(
    driver: &mut D,
    form: &FormConfig,
    policy: &WaitPolicy,
    query: &SearchQuery,
) -> Result<FormOutcome>
where
    D: FormDriver + ?Sized,
{
    info!(page = %form.page_url, kind = %query.kind, "Opening search form");
    driver.open(&form.page_url).await?;

    wait_for_control(driver, &form.subtype_control, policy).await?;
    driver
        .select_option(&form.subtype_control, query.kind.subtype())
        .await?;

    // Selecting a subtype swaps the criteria row in client-side
    let value_control = form.value_control(query);
    wait_for_control(driver, &value_control, policy).await?;

    if let Some(comparator) = form.comparator_control(query) {
        if driver.control_state(&comparator).await? == ControlState::Interactable {
            driver
                .select_option(&comparator, &query.comparator.to_string())
                .await?;
        }
    }

    driver.type_text(&value_control, &query.value).await?;

    wait_for_control(driver, &form.submit_control, policy).await?;
    let outcome = driver.click(&form.submit_control).await?;

    info!(url = %outcome.url, status = outcome.status, "Search form submitted");
    Ok(outcome)
}
