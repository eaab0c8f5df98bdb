//! True Positive List Loader Library
//!
//! Fetches the curated list of confirmed attacker addresses (remote CSV with
//! local fallback) and merges it into a caller-owned attacker registry for
//! use by attacker-tracing systems.
//!
//! Author: AI-Generated
//! Created: 2026-08-29

pub mod address;
pub mod config;
pub mod fetcher;
pub mod registry;

// Re-export commonly used types
pub use config::{load_config, LoaderConfig};
pub use fetcher::{FetchError, TruePositiveFetcher};
pub use registry::{AttackerMetadata, AttackerRegistry, TRUE_POSITIVE_ORIGIN};
