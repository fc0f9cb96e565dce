//! Phone number parsing behind a narrow trait.

use phonenumber::{Mode, country};
use tracing::trace;

/// Outcome of parsing a phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPhone {
    pub is_valid: bool,
    /// `+<calling code>` international representation.
    pub international_format: String,
    /// ISO 3166-1 alpha-2 region the number belongs to, if geographic.
    pub detected_region: Option<String>,
}

/// Parses a raw phone string using a region hint for numbers without a `+` prefix.
pub trait PhoneNormalizer: Send + Sync {
    /// Returns `None` when the input cannot be parsed as a phone number at all.
    fn parse_phone(&self, raw: &str, region_hint: &str) -> Option<ParsedPhone>;
}

/// Normalizer backed by the `phonenumber` crate (libphonenumber metadata).
#[derive(Debug, Clone, Copy, Default)]
pub struct LibPhoneNormalizer;

impl PhoneNormalizer for LibPhoneNormalizer {
    fn parse_phone(&self, raw: &str, region_hint: &str) -> Option<ParsedPhone> {
        let region = parse_region(region_hint);
        let number = match phonenumber::parse(region, raw) {
            Ok(number) => number,
            Err(e) => {
                trace!(error = %e, "Phone number did not parse");
                return None;
            }
        };

        Some(ParsedPhone {
            is_valid: phonenumber::is_valid(&number),
            international_format: space_separated(
                &number.format().mode(Mode::International).to_string(),
            ),
            detected_region: number.country().id().map(|id| id.as_ref().to_string()),
        })
    }
}

/// Collapse every run of punctuation or whitespace into one space, giving
/// `+1 202 555 1234` instead of `+1 202-555-1234`.
fn space_separated(formatted: &str) -> String {
    let mut out = String::with_capacity(formatted.len());
    let mut pending_space = false;
    for c in formatted.chars() {
        if is_separator(c) {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}

fn is_separator(c: char) -> bool {
    matches!(
        c,
        '-' | '.' | '/' | '(' | ')' | '[' | ']' | '~' | '\u{2010}'..='\u{2015}' | '\u{2212}'
    ) || c.is_whitespace()
}

/// Resolve a region hint case-insensitively. Unknown hints resolve to `None`.
#[must_use]
pub fn parse_region(hint: &str) -> Option<country::Id> {
    hint.trim().to_ascii_uppercase().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_hints_are_case_insensitive() {
        assert_eq!(parse_region("US"), Some(country::Id::US));
        assert_eq!(parse_region(" gb "), Some(country::Id::GB));
        assert_eq!(parse_region("ZZZ"), None);
        assert_eq!(parse_region(""), None);
    }

    #[test]
    fn parses_national_number_with_hint() {
        let parsed = LibPhoneNormalizer.parse_phone("2025551234", "US").unwrap();
        assert!(parsed.is_valid);
        assert_eq!(parsed.international_format, "+1 202 555 1234");
        assert_eq!(parsed.detected_region.as_deref(), Some("US"));
    }

    #[test]
    fn explicit_country_code_overrides_hint() {
        let parsed = LibPhoneNormalizer
            .parse_phone("+44 20 7946 0958", "US")
            .unwrap();
        assert!(parsed.is_valid);
        assert_eq!(parsed.international_format, "+44 20 7946 0958");
        assert_eq!(parsed.detected_region.as_deref(), Some("GB"));
    }

    #[test]
    fn separators_become_single_spaces() {
        assert_eq!(space_separated("+1 202-555-1234"), "+1 202 555 1234");
        assert_eq!(space_separated("+33 1.23.45.67.89"), "+33 1 23 45 67 89");
        assert_eq!(space_separated("+7 (495) 123--45/67 "), "+7 495 123 45 67");
        assert_eq!(space_separated("+44 20 7946 0958"), "+44 20 7946 0958");
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(LibPhoneNormalizer.parse_phone("abc", "US"), None);
        assert_eq!(LibPhoneNormalizer.parse_phone("", "US"), None);
    }
}
