//! Canonical comparison keys for MAC addresses, usernames and user ids.
//!
//! Nothing here mutates the values carried into output; callers keep the raw
//! strings and use these keys only for joining.

use crate::config::{MAC_BYTES, MAC_SEPARATORS, NULL_MARKERS};
use base64::Engine;
use clap::ValueEnum;

/// How MAC values are written in the MAC export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MacEncoding {
    /// Hex digits, optionally separated by `:`, `-` or `.`
    #[default]
    Text,
    /// Standard base64 of the six raw bytes
    Base64,
    /// Text first, then base64
    Auto,
}

/// Canonical `aa:bb:cc:dd:ee:ff` form of a textual MAC, or `None` if the value
/// is not exactly 12 hex digits once separators are removed.
pub fn canonical_mac(raw: &str) -> Option<String> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| !MAC_SEPARATORS.contains(c))
        .collect();

    if digits.len() != MAC_BYTES * 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let digits = digits.to_ascii_lowercase();
    let mut out = String::with_capacity(MAC_BYTES * 3 - 1);
    for (i, pair) in digits.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            out.push(':');
        }
        out.push(pair[0] as char);
        out.push(pair[1] as char);
    }
    Some(out)
}

/// Decode a base64 MAC (six raw bytes) into canonical form
pub fn decode_base64_mac(raw: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(raw.trim())
        .ok()?;
    if bytes.len() != MAC_BYTES {
        return None;
    }
    Some(format_mac_bytes(&bytes))
}

fn format_mac_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// True for the `\N` / `N/A` placeholders dumps write for a missing MAC
pub fn is_null_marker(raw: &str) -> bool {
    let trimmed = raw.trim();
    NULL_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Normalize a MAC according to the configured encoding. Null markers are
/// always invalid.
pub fn normalize_mac(raw: &str, encoding: MacEncoding) -> Option<String> {
    if is_null_marker(raw) {
        return None;
    }
    match encoding {
        MacEncoding::Text => canonical_mac(raw),
        MacEncoding::Base64 => decode_base64_mac(raw),
        MacEncoding::Auto => canonical_mac(raw).or_else(|| decode_base64_mac(raw)),
    }
}

/// Join key for usernames: trimmed and lower-cased.
///
/// This is a simple per-character lowercase mapping, not full Unicode case
/// folding, so multi-character folds such as `ß` / `SS` do not match.
pub fn username_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Join key for user ids: trimmed, otherwise compared exactly
pub fn identifier_key(raw: &str) -> &str {
    raw.trim()
}
