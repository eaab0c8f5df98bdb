//! Attacker registry data model
//!
//! The registry maps a lowercase address to the provenance of the data source
//! that first contributed it. It is owned by the caller (the wider tracing
//! system seeds it from alerts and funding analysis) and mutated in place by
//! loaders like [`crate::fetcher::TruePositiveFetcher`].
//!
//! Author: AI-Generated
//! Created: 2026-08-29

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Origin tag for entries contributed by the True Positive List.
pub const TRUE_POSITIVE_ORIGIN: &str = "True Positive List";

/// Provenance metadata for one attacker address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackerMetadata {
    /// Which data source contributed this entry
    pub origin: String,
    /// Relational distance from a seed address (always 0 for list sources)
    pub hops: u32,
}

impl AttackerMetadata {
    /// Metadata for a direct True Positive List entry.
    pub fn true_positive() -> Self {
        Self {
            origin: TRUE_POSITIVE_ORIGIN.to_string(),
            hops: 0,
        }
    }
}

/// Address → provenance mapping, keyed by lowercase `0x...` address.
pub type AttackerRegistry = HashMap<String, AttackerMetadata>;
