//! pdbq Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared record types, errors, and logging setup for the pdbq workspace.
//!
//! # Overview
//!
//! - **Types**: structure identifiers, chain and sequence records, field reports
//! - **Error Handling**: model validation errors and the result alias
//! - **Logging**: `tracing` subscriber configuration shared by every binary
//!
//! # Example
//!
//! ```
//! use pdbq_common::types::StructureId;
//!
//! let id: StructureId = "5jup".parse().unwrap();
//! assert_eq!(id.as_str(), "5JUP");
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{PdbqError, Result};
