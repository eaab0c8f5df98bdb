//! Address validation helpers
//!
//! Strict-shape validation for EOA/contract address strings: `0x` prefix
//! followed by exactly 40 hex digits, case-insensitive. No checksum
//! verification — the True Positive List carries mixed-case entries and
//! acceptance is format-only.
//!
//! Author: AI-Generated
//! Created: 2026-08-29

/// Is this a well-formed `0x`-prefixed 40-hex-digit address?
pub fn is_valid_address(s: &str) -> bool {
    let Some(hex) = s.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize an address string to lowercase.
/// Callers validate first; this only lowercases.
pub fn normalize_address(s: &str) -> String {
    s.to_lowercase()
}
