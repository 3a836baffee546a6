//! API client module
//!
//! HTTP client for the RCSB PDB REST services.

pub mod client;
pub mod endpoints;

pub use client::{ChainsWithSequences, RcsbClient};
