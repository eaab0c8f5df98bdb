//! True Positive List fetcher
//!
//! Pulls the curated list of confirmed attacker addresses from a remote CSV,
//! falling back to a local cached copy when the remote fetch fails, and merges
//! the validated addresses into a caller-owned attacker registry.
//!
//! Failure policy: remote failure triggers exactly one local fallback attempt;
//! failure of both is logged and the registry is left untouched. No error
//! escapes [`TruePositiveFetcher::load`] — worst case is a no-op with
//! diagnostics. Malformed address tokens are silently dropped (lenient
//! validation is the contract for this source, not a defect).
//!
//! Author: AI-Generated
//! Created: 2026-08-29

use crate::address::{is_valid_address, normalize_address};
use crate::registry::{AttackerMetadata, AttackerRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

/// Why a single source attempt (remote or local) failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read local list: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV header row has no Attacker column")]
    MissingColumn,
    #[error("CSV record on line {line} has no Attacker cell")]
    MalformedRow { line: u64 },
}

/// Loads the True Positive List into an [`AttackerRegistry`].
///
/// Each `load` call independently tries remote-then-local; which source
/// succeeded is not cached between calls.
pub struct TruePositiveFetcher {
    /// Remote CSV resource
    list_url: String,
    /// Local fallback, resolved against `base_dir` when relative
    list_path: String,
    /// Base directory for local path resolution
    base_dir: PathBuf,
    client: reqwest::Client,
}

impl TruePositiveFetcher {
    /// Create a fetcher for the given remote URL and local fallback path.
    /// Relative local paths resolve against the process working directory.
    pub fn new(list_url: impl Into<String>, list_path: impl Into<String>) -> Self {
        Self {
            list_url: list_url.into(),
            list_path: list_path.into(),
            base_dir: PathBuf::from("."),
            client: reqwest::Client::new(),
        }
    }

    /// Override the base directory used to resolve a relative local path.
    pub fn with_base_dir<P: AsRef<Path>>(mut self, base_dir: P) -> Self {
        self.base_dir = base_dir.as_ref().to_path_buf();
        self
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fetch the True Positive List and merge it into `registry`.
    ///
    /// New addresses are inserted with origin "True Positive List" and
    /// hops 0; addresses already present keep their existing metadata.
    /// Never returns an error: if both sources fail the registry is left
    /// unchanged and the failure is logged.
    pub async fn load(&self, registry: &mut AttackerRegistry) {
        let attackers = match self.fetch_remote().await {
            Ok(list) => {
                info!(
                    "True Positive List fetched remotely: {} addresses",
                    list.len()
                );
                list
            }
            Err(remote_err) => {
                error!("Remote True Positive List fetch failed: {}", remote_err);
                match self.fetch_local() {
                    Ok(list) => {
                        info!(
                            "True Positive List read from local fallback: {} addresses",
                            list.len()
                        );
                        list
                    }
                    Err(local_err) => {
                        error!("Local True Positive List fetch failed: {}", local_err);
                        error!("Both True Positive List sources failed; registry unchanged");
                        return;
                    }
                }
            }
        };

        let mut inserted = 0usize;
        for attacker in attackers {
            if !registry.contains_key(&attacker) {
                registry.insert(attacker, AttackerMetadata::true_positive());
                inserted += 1;
            }
        }
        info!(
            "True Positive List merged: {} new registry entries",
            inserted
        );
    }

    // ------------------------------------------------------------------
    // Source attempts
    // ------------------------------------------------------------------

    /// GET the remote CSV and collect its addresses.
    /// Non-2xx responses and row-level parse errors both abort this path.
    async fn fetch_remote(&self) -> Result<Vec<String>, FetchError> {
        let body = self
            .client
            .get(&self.list_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        self.collect_addresses(&body)
    }

    /// Read the local fallback CSV and collect its addresses.
    fn fetch_local(&self) -> Result<Vec<String>, FetchError> {
        let path = self.base_dir.join(&self.list_path);
        let content = fs::read_to_string(&path)?;
        self.collect_addresses(&content)
    }

    // ------------------------------------------------------------------
    // CSV parsing
    // ------------------------------------------------------------------

    /// Parse CSV text and accumulate every valid address, lowercased, one
    /// entry per occurrence. The `Attacker` cell holds one or more
    /// comma-separated candidates; malformed candidates are dropped.
    fn collect_addresses(&self, content: &str) -> Result<Vec<String>, FetchError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let attacker_idx = headers
            .iter()
            .position(|h| h == "Attacker")
            .ok_or(FetchError::MissingColumn)?;

        let mut attackers = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() <= attacker_idx {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(FetchError::MalformedRow { line });
            }

            // An unquoted comma-separated cell arrives from the parser as
            // extra fields spilled past the header count; rejoin them so
            // quoted and unquoted cells yield the same candidate list.
            let spill = record.len().saturating_sub(headers.len());
            let cell = record
                .iter()
                .skip(attacker_idx)
                .take(spill + 1)
                .collect::<Vec<_>>()
                .join(",");

            for candidate in cell.split(',') {
                let candidate = candidate.trim();
                if is_valid_address(candidate) {
                    attackers.push(normalize_address(candidate));
                } else if !candidate.is_empty() {
                    debug!("Dropping malformed attacker token: {}", candidate);
                }
            }
        }

        Ok(attackers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const ADDR_A: &str = "0xaaaa000000000000000000000000000000000a00";
    const ADDR_A_UPPER: &str = "0xAAAA000000000000000000000000000000000A00";
    const ADDR_B: &str = "0xbbbb000000000000000000000000000000000b00";

    fn fetcher() -> TruePositiveFetcher {
        TruePositiveFetcher::new("http://127.0.0.1:9/tp.csv", "missing.csv")
    }

    /// Write CSV content to a unique temp file; returns (base_dir, file_name).
    fn write_temp_csv(name: &str, content: &str) -> (PathBuf, String) {
        let file_name = format!("tp_list_{}_{}.csv", std::process::id(), name);
        let base_dir = env::temp_dir();
        fs::write(base_dir.join(&file_name), content).unwrap();
        (base_dir, file_name)
    }

    // ------------------------------------------------------------------
    // collect_addresses
    // ------------------------------------------------------------------

    #[test]
    fn test_quoted_cell_with_multiple_addresses() {
        let csv = format!("Attacker\n\"{}, {}\"\n", ADDR_A_UPPER, ADDR_B);
        let got = fetcher().collect_addresses(&csv).unwrap();
        assert_eq!(got, vec![ADDR_A.to_string(), ADDR_B.to_string()]);
    }

    #[test]
    fn test_unquoted_cell_spills_into_extra_fields() {
        let csv = format!("Attacker\n{}, not-an-address\n", ADDR_A_UPPER);
        let got = fetcher().collect_addresses(&csv).unwrap();
        assert_eq!(got, vec![ADDR_A.to_string()]);
    }

    #[test]
    fn test_malformed_tokens_dropped() {
        let csv = "Attacker\n\"0x1234, short, 0xzzzz000000000000000000000000000000000a00\"\n";
        let got = fetcher().collect_addresses(csv).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn test_addresses_lowercased_and_trimmed() {
        let csv = format!("Attacker\n\"  {}  \"\n", ADDR_A_UPPER);
        let got = fetcher().collect_addresses(&csv).unwrap();
        assert_eq!(got, vec![ADDR_A.to_string()]);
    }

    #[test]
    fn test_duplicates_accumulated_per_occurrence() {
        let csv = format!("Attacker\n{}\n{}\n", ADDR_A, ADDR_A_UPPER);
        let got = fetcher().collect_addresses(&csv).unwrap();
        assert_eq!(got, vec![ADDR_A.to_string(), ADDR_A.to_string()]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = format!("Attacker\n\n{}\n\n{}\n", ADDR_A, ADDR_B);
        let got = fetcher().collect_addresses(&csv).unwrap();
        assert_eq!(got, vec![ADDR_A.to_string(), ADDR_B.to_string()]);
    }

    #[test]
    fn test_columns_after_attacker_not_swallowed() {
        let csv = format!("Attacker,Notes\n{},{}\n", ADDR_A, ADDR_B);
        let got = fetcher().collect_addresses(&csv).unwrap();
        // Notes column holds a valid-looking address but is not an Attacker cell
        assert_eq!(got, vec![ADDR_A.to_string()]);
    }

    #[test]
    fn test_missing_attacker_column_is_parse_failure() {
        let csv = format!("Address\n{}\n", ADDR_A);
        let err = fetcher().collect_addresses(&csv).unwrap_err();
        assert!(matches!(err, FetchError::MissingColumn));
    }

    #[test]
    fn test_record_too_short_is_parse_failure() {
        let csv = format!("Chain,Attacker\nethereum,{}\nethereum\n", ADDR_A);
        let err = fetcher().collect_addresses(&csv).unwrap_err();
        assert!(matches!(err, FetchError::MalformedRow { .. }));
    }

    // ------------------------------------------------------------------
    // load (fallback chain + registry merge)
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_local() {
        let csv = format!("Attacker\n\"{}, not-an-address\"\n", ADDR_A_UPPER);
        let (base_dir, file_name) = write_temp_csv("fallback", &csv);
        let fetcher = TruePositiveFetcher::new("http://127.0.0.1:9/tp.csv", &file_name)
            .with_base_dir(&base_dir);

        let mut registry = AttackerRegistry::new();
        fetcher.load(&mut registry).await;

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(ADDR_A),
            Some(&AttackerMetadata::true_positive())
        );
    }

    #[tokio::test]
    async fn test_existing_entries_never_overwritten() {
        let csv = format!("Attacker\n{}\n{}\n", ADDR_A_UPPER, ADDR_B);
        let (base_dir, file_name) = write_temp_csv("preserve", &csv);
        let fetcher = TruePositiveFetcher::new("http://127.0.0.1:9/tp.csv", &file_name)
            .with_base_dir(&base_dir);

        let seed = AttackerMetadata {
            origin: "seed".to_string(),
            hops: 3,
        };
        let mut registry = AttackerRegistry::new();
        registry.insert(ADDR_A.to_string(), seed.clone());
        fetcher.load(&mut registry).await;

        // Seeded entry untouched, new address inserted
        assert_eq!(registry.get(ADDR_A), Some(&seed));
        assert_eq!(
            registry.get(ADDR_B),
            Some(&AttackerMetadata::true_positive())
        );
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_both_sources_failing_leaves_registry_unchanged() {
        let fetcher = TruePositiveFetcher::new("http://127.0.0.1:9/tp.csv", "missing.csv")
            .with_base_dir(env::temp_dir().join("tp_list_no_such_dir"));

        let seed = AttackerMetadata {
            origin: "seed".to_string(),
            hops: 3,
        };
        let mut registry = AttackerRegistry::new();
        registry.insert(ADDR_A.to_string(), seed.clone());

        // Must not panic or propagate an error
        fetcher.load(&mut registry).await;

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(ADDR_A), Some(&seed));
    }

    #[tokio::test]
    async fn test_local_parse_failure_leaves_registry_unchanged() {
        let csv = format!("Address\n{}\n", ADDR_A);
        let (base_dir, file_name) = write_temp_csv("bad_header", &csv);
        let fetcher = TruePositiveFetcher::new("http://127.0.0.1:9/tp.csv", &file_name)
            .with_base_dir(&base_dir);

        let mut registry = AttackerRegistry::new();
        fetcher.load(&mut registry).await;
        assert!(registry.is_empty());
    }
}
