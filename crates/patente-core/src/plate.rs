//! License plate normalization and the canonical `PlateNumber` key.
//!
//! Raw text (user input or OCR output) is reduced to a canonical uppercase
//! alphanumeric identifier through an ordered cascade of format patterns.
//! The canonical form is immutable and serves as the sole cache and lookup
//! key for the whole pipeline.

use crate::error::PlateError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Canonical license plate identifier.
///
/// Always uppercase alphanumeric, 5-7 characters, no separators. Construct
/// via [`PlateNumber::normalize`] for arbitrary text or [`PlateNumber::new`]
/// for values that are already canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlateNumber(String);

/// Plate format cascade, most specific first. The first pattern that
/// matches a contiguous run of the cleaned input wins; later patterns are
/// never consulted.
fn format_cascade() -> &'static [Regex; 4] {
    static CASCADE: OnceLock<[Regex; 4]> = OnceLock::new();
    CASCADE.get_or_init(|| {
        [
            // Modern format: four letters, two digits (BBBB12)
            Regex::new(r"[A-Z]{4}[0-9]{2}").expect("valid regex"),
            // Legacy format: two letters, four digits (AB1234)
            Regex::new(r"[A-Z]{2}[0-9]{4}").expect("valid regex"),
            // Hybrid 2+2+2: letters, digits, letters (XY12ZW)
            Regex::new(r"[A-Z]{2}[0-9]{2}[A-Z]{2}").expect("valid regex"),
            // Generic fallback: any 6-7 alphanumeric run
            Regex::new(r"[A-Z0-9]{6,7}").expect("valid regex"),
        ]
    })
}

fn canonical_pattern() -> &'static Regex {
    static CANONICAL: OnceLock<Regex> = OnceLock::new();
    CANONICAL.get_or_init(|| Regex::new(r"^[A-Z0-9]{5,7}$").expect("valid regex"))
}

impl PlateNumber {
    /// Wrap an already-canonical plate value.
    ///
    /// # Errors
    /// Returns [`PlateError::InvalidFormat`] if the value is not uppercase
    /// alphanumeric of 5-7 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, PlateError> {
        let value = value.into();
        if canonical_pattern().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(PlateError::InvalidFormat {
                input: value,
                reason: "expected 5-7 uppercase alphanumeric characters".to_string(),
            })
        }
    }

    /// Normalize arbitrary recognized text into a canonical plate number.
    ///
    /// Whitespace and separators are stripped and the text is uppercased
    /// before the format cascade runs. Only the leftmost occurrence of the
    /// winning pattern is used; multiple candidates are never scored.
    ///
    /// # Errors
    /// Returns [`PlateError::Unrecognized`] when no pattern matches,
    /// including for empty or whitespace-only input.
    pub fn normalize(raw: &str) -> Result<Self, PlateError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.' && *c != '·')
            .collect::<String>()
            .to_uppercase();

        if cleaned.is_empty() {
            return Err(PlateError::Unrecognized {
                input: raw.trim().to_string(),
            });
        }

        for pattern in format_cascade() {
            if let Some(m) = pattern.find(&cleaned) {
                return Ok(Self(m.as_str().to_string()));
            }
        }

        Err(PlateError::Unrecognized {
            input: raw.trim().to_string(),
        })
    }

    /// Get the canonical string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the plate in the human-readable hyphenated form.
    ///
    /// Known shapes get a hyphen (`BBBB-12`, `AB-1234`); anything else is
    /// returned unhyphenated.
    #[must_use]
    pub fn display(&self) -> String {
        static MODERN: OnceLock<Regex> = OnceLock::new();
        static LEGACY: OnceLock<Regex> = OnceLock::new();
        let modern = MODERN.get_or_init(|| Regex::new(r"^[A-Z]{4}[0-9]{2}$").expect("valid regex"));
        let legacy = LEGACY.get_or_init(|| Regex::new(r"^[A-Z]{2}[0-9]{4}$").expect("valid regex"));

        if modern.is_match(&self.0) {
            format!("{}-{}", &self.0[..4], &self.0[4..])
        } else if legacy.is_match(&self.0) {
            format!("{}-{}", &self.0[..2], &self.0[2..])
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for PlateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_legacy_format() {
        let plate = PlateNumber::normalize("ab-1234").expect("normalize legacy plate");
        assert_eq!(plate.as_str(), "AB1234");
    }

    #[test]
    fn test_normalize_modern_format() {
        let plate = PlateNumber::normalize("bbcl 42").expect("normalize modern plate");
        assert_eq!(plate.as_str(), "BBCL42");
    }

    #[test]
    fn test_normalize_hybrid_format() {
        let plate = PlateNumber::normalize("xy·12·zw").expect("normalize hybrid plate");
        assert_eq!(plate.as_str(), "XY12ZW");
    }

    #[test]
    fn test_normalize_generic_fallback() {
        // Doesn't fit any specific shape but is a 6-char alphanumeric run
        let plate = PlateNumber::normalize("a1b2c3").expect("normalize generic run");
        assert_eq!(plate.as_str(), "A1B2C3");
    }

    #[test]
    fn test_normalize_whitespace_only() {
        assert!(PlateNumber::normalize("   ").is_err());
        assert!(PlateNumber::normalize("").is_err());
    }

    #[test]
    fn test_normalize_ocr_noise() {
        // Surrounding OCR noise is ignored, leftmost match wins
        let plate = PlateNumber::normalize("PATENTE: JVJV20 (frontal)").expect("normalize");
        // "PATENTE" itself contains a 7-char letter run, which the generic
        // pattern would catch, but the specific 4+2 pattern wins first and
        // its leftmost occurrence is JVJV20.
        assert_eq!(plate.as_str(), "JVJV20");
    }

    #[test]
    fn test_normalize_no_match() {
        assert!(PlateNumber::normalize("!! ??").is_err());
        assert!(PlateNumber::normalize("ab12").is_err());
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["ab-1234", "JVJV20", "xy 12 zw", "a1b2c3d"] {
            let once = PlateNumber::normalize(raw).expect("first normalization");
            let twice = PlateNumber::normalize(once.as_str()).expect("second normalization");
            assert_eq!(once, twice, "normalize must be idempotent for {raw}");
        }
    }

    #[test]
    fn test_new_canonical() {
        assert!(PlateNumber::new("AB1234").is_ok());
        assert!(PlateNumber::new("BBBB12").is_ok());
        // 5 characters is accepted as canonical even though the cascade
        // never produces it
        assert!(PlateNumber::new("AB123").is_ok());
    }

    #[test]
    fn test_new_rejects_non_canonical() {
        assert!(PlateNumber::new("ab1234").is_err());
        assert!(PlateNumber::new("AB-1234").is_err());
        assert!(PlateNumber::new("AB12").is_err());
        assert!(PlateNumber::new("ABCD1234").is_err());
    }

    #[test]
    fn test_display_hyphenation() {
        let modern = PlateNumber::new("BBCL42").expect("valid plate");
        assert_eq!(modern.display(), "BBCL-42");

        let legacy = PlateNumber::new("AB1234").expect("valid plate");
        assert_eq!(legacy.display(), "AB-1234");

        let other = PlateNumber::new("A1B2C3").expect("valid plate");
        assert_eq!(other.display(), "A1B2C3");
    }

    #[test]
    fn test_serde_transparent() {
        let plate = PlateNumber::new("JVJV20").expect("valid plate");
        let json = serde_json::to_string(&plate).expect("serialize plate");
        assert_eq!(json, "\"JVJV20\"");

        let parsed: PlateNumber = serde_json::from_str(&json).expect("deserialize plate");
        assert_eq!(parsed, plate);
    }
}
