//! Table-driven resolver for local runs.
//!
//! Stands in for the real phone-metadata library behind the
//! [`PhoneResolver`](crate::ports::PhoneResolver) seam: a calling-code
//! table gives the country, the carrier part stays empty (the table has
//! no carrier data, and an empty carrier is a legal resolution).

use crate::ports::{PhoneResolver, ResolveError};

/// Country calling codes, longest-match wins (`+1242...` is the Bahamas
/// only if listed; otherwise it falls back to `+1`).
const CALLING_CODES: &[(&str, &str)] = &[
    ("1", "United States"),
    ("7", "Russia"),
    ("20", "Egypt"),
    ("27", "South Africa"),
    ("31", "Netherlands"),
    ("33", "France"),
    ("34", "Spain"),
    ("39", "Italy"),
    ("44", "United Kingdom"),
    ("46", "Sweden"),
    ("48", "Poland"),
    ("49", "Germany"),
    ("52", "Mexico"),
    ("55", "Brazil"),
    ("61", "Australia"),
    ("81", "Japan"),
    ("82", "South Korea"),
    ("86", "China"),
    ("90", "Turkey"),
    ("91", "India"),
    ("351", "Portugal"),
    ("380", "Ukraine"),
    ("420", "Czech Republic"),
    ("971", "United Arab Emirates"),
];

/// Calling-code table resolver (development and tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixResolver;

impl PrefixResolver {
    pub fn new() -> Self {
        Self
    }
}

impl PhoneResolver for PrefixResolver {
    fn resolve(&self, number: &str) -> Result<String, ResolveError> {
        let digits = number
            .strip_prefix('+')
            .ok_or_else(|| ResolveError::Invalid(format!("missing leading +: {number:?}")))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ResolveError::Invalid(format!(
                "not a digit string: {number:?}"
            )));
        }
        // E.164: at most 15 digits; anything under 7 cannot carry a
        // subscriber number.
        if !(7..=15).contains(&digits.len()) {
            return Err(ResolveError::Invalid(format!(
                "expected 7..=15 digits, got {}",
                digits.len()
            )));
        }

        for len in (1..=3).rev() {
            if let Some(prefix) = digits.get(..len)
                && let Some((_, country)) =
                    CALLING_CODES.iter().find(|(code, _)| *code == prefix)
            {
                // Carrier data is out of this table's reach; empty is fine.
                return Ok(format!("{country}: "));
            }
        }

        Err(ResolveError::Invalid(format!(
            "unrecognized calling code: {number:?}"
        )))
    }
}
