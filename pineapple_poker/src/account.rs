//! Account identifiers and token amounts shared by the venue and its token collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amounts in base units (18-decimal fixed point by default).
pub type Amount = u128;

/// Signed amount used for settlement deltas.
pub type SignedAmount = i128;

/// Decimal places used by the standard token and by config parsing.
pub const TOKEN_DECIMALS: u32 = 18;

/// An opaque account identifier: a player, the venue escrow account, the owner,
/// or a token contract.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Parse a human-readable decimal amount (`"10"`, `"0.1"`) into base units.
///
/// Returns `None` for malformed input, more fractional digits than `decimals`,
/// or overflow.
pub fn parse_units(s: &str, decimals: u32) -> Option<Amount> {
    let s = s.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() > decimals as usize || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let scale = 10u128.checked_pow(decimals)?;
    let whole: Amount = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let frac_units: Amount = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = decimals as usize);
        padded.parse().ok()?
    };

    whole.checked_mul(scale)?.checked_add(frac_units)
}

/// Convert whole tokens into base units.
pub fn units(whole: u64, decimals: u32) -> Amount {
    Amount::from(whole).saturating_mul(10u128.saturating_pow(decimals))
}

/// Render base units as a decimal string with trailing zeros trimmed.
pub fn format_units(amount: Amount, decimals: u32) -> String {
    let scale = 10u128.saturating_pow(decimals);
    let whole = amount / scale;
    let frac = amount % scale;
    if frac == 0 {
        return whole.to_string();
    }

    let frac = format!("{frac:0>width$}", width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
