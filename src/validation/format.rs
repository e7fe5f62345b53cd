use crate::models::rules::{
    lookup_type_code, DOMAIN_PREFIX, MAX_IDENTIFIER_LENGTH, MIN_IDENTIFIER_LENGTH,
    UNKNOWN_TYPE_DESCRIPTION, YEAR_EPOCH_OFFSET, YEAR_WINDOW_FUTURE, YEAR_WINDOW_PAST,
};
use crate::models::{IdentifierValidation, ParsedIdentifier};
use crate::utils::IdentifierError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // prefix, year code, HH, MM, SS, type code, sequence
    static ref IDENTIFIER_GRAMMAR: Regex = Regex::new(&format!(
        r"^{}([0-9]{{2}})([0-9]{{2}})([0-9]{{2}})([0-9]{{2}})([A-Z0-9]{{4}})([0-9]{{3,5}})$",
        DOMAIN_PREFIX
    ))
    .unwrap();
}

/// Grammar and semantic checks for transaction references.
pub struct IdentifierParser;

impl IdentifierParser {
    /// Decode `id`, or `None` if it fails any check.
    pub fn parse(id: &str, current_year: i32) -> Option<ParsedIdentifier> {
        Self::parse_strict(id, current_year).ok()
    }

    /// Like `parse`, but says which check failed first.
    pub fn validate(id: &str, current_year: i32) -> IdentifierValidation {
        match Self::parse_strict(id, current_year) {
            Ok(parsed) => IdentifierValidation {
                valid: true,
                reason: None,
                parsed: Some(parsed),
            },
            Err(err) => IdentifierValidation {
                valid: false,
                reason: Some(err.to_string()),
                parsed: None,
            },
        }
    }

    /// Checks run in order: prefix, length, grammar, then time and year.
    pub fn parse_strict(id: &str, current_year: i32) -> Result<ParsedIdentifier, IdentifierError> {
        let id = Self::canonicalize(id);

        if !id.starts_with(DOMAIN_PREFIX) {
            return Err(IdentifierError::PrefixMismatch {
                expected: DOMAIN_PREFIX.to_string(),
                found: id.chars().take(DOMAIN_PREFIX.len()).collect(),
            });
        }

        let length = id.chars().count();
        if !(MIN_IDENTIFIER_LENGTH..=MAX_IDENTIFIER_LENGTH).contains(&length) {
            return Err(IdentifierError::InvalidLength(length));
        }

        let caps = IDENTIFIER_GRAMMAR
            .captures(&id)
            .ok_or_else(|| IdentifierError::PatternMismatch(id.clone()))?;

        let number = |index: usize| -> Result<u32, IdentifierError> {
            caps[index]
                .parse::<u32>()
                .map_err(|_| IdentifierError::PatternMismatch(id.clone()))
        };
        let year_code = number(1)?;
        let hour = number(2)?;
        let minute = number(3)?;
        let second = number(4)?;

        if hour > 23 || minute > 59 || second > 59 {
            return Err(IdentifierError::InvalidTime { hour, minute, second });
        }

        let year = year_code as i32 + YEAR_EPOCH_OFFSET;
        let min = current_year - YEAR_WINDOW_PAST;
        let max = current_year + YEAR_WINDOW_FUTURE;
        if !(min..=max).contains(&year) {
            return Err(IdentifierError::YearOutOfRange { year, min, max });
        }

        let type_code = caps[5].to_string();
        let known = lookup_type_code(&type_code);

        Ok(ParsedIdentifier {
            year_code: caps[1].to_string(),
            year,
            hour,
            minute,
            second,
            type_description: known
                .map(|entry| entry.description)
                .unwrap_or(UNKNOWN_TYPE_DESCRIPTION)
                .to_string(),
            is_known_type: known.is_some(),
            type_code,
            sequence: caps[6].to_string(),
            length,
            raw: id.clone(),
        })
    }

    fn canonicalize(id: &str) -> String {
        id.trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2568;

    #[test]
    fn parses_canonical_reference() {
        let parsed = IdentifierParser::parse("015298170819BQR02651", YEAR).unwrap();
        assert_eq!(parsed.year, 2568);
        assert_eq!(parsed.year_code, "98");
        assert_eq!(parsed.time(), "17:08:19");
        assert_eq!(parsed.type_code, "BQR0");
        assert_eq!(parsed.type_description, "Bill QR Payment");
        assert!(parsed.is_known_type);
        assert_eq!(parsed.sequence, "2651");
        assert_eq!(parsed.length, 20);
    }

    #[test]
    fn accepts_21_character_reference() {
        let parsed = IdentifierParser::parse("015298093011ATF012345", YEAR).unwrap();
        assert_eq!(parsed.sequence, "12345");
        assert_eq!(parsed.length, 21);
    }

    #[test]
    fn input_is_trimmed_and_uppercased() {
        let parsed = IdentifierParser::parse("  0152 9817 0819 bqr0 2651\n", YEAR).unwrap();
        assert_eq!(parsed.raw, "015298170819BQR02651");
    }

    #[test]
    fn unknown_type_code_still_parses() {
        let parsed = IdentifierParser::parse("015298170819ZZZ92651", YEAR).unwrap();
        assert!(!parsed.is_known_type);
        assert_eq!(parsed.type_description, "Unknown");
    }

    #[test]
    fn wrong_prefix_is_reported_first() {
        let result = IdentifierParser::validate("015398170819BQR02651", YEAR);
        assert!(!result.valid);
        assert!(result.parsed.is_none());
        assert!(result.reason.unwrap().contains("prefix mismatch"));

        // wrong prefix and wrong length: prefix wins
        let err = IdentifierParser::parse_strict("9999", YEAR).unwrap_err();
        assert!(matches!(err, IdentifierError::PrefixMismatch { .. }));
    }

    #[test]
    fn length_is_checked_before_pattern() {
        let err = IdentifierParser::parse_strict("0152981708BQR02", YEAR).unwrap_err();
        assert_eq!(err, IdentifierError::InvalidLength(15));
        let err = IdentifierParser::parse_strict("0152981708190BQR026510", YEAR).unwrap_err();
        assert_eq!(err, IdentifierError::InvalidLength(22));
    }

    #[test]
    fn malformed_body_is_a_pattern_mismatch() {
        let err = IdentifierParser::parse_strict("015298170819BQR0265A", YEAR).unwrap_err();
        assert!(matches!(err, IdentifierError::PatternMismatch(_)));
        assert!(!err.is_semantic());
    }

    #[test]
    fn impossible_time_is_semantic() {
        let result = IdentifierParser::validate("015298250819BQR02651", YEAR);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("invalid time"));

        let err = IdentifierParser::parse_strict("015298176019BQR02651", YEAR).unwrap_err();
        assert!(err.is_semantic());
    }

    #[test]
    fn year_window_is_inclusive() {
        // 93 -> 2563 = current - 5; 99 -> 2569 = current + 1
        assert!(IdentifierParser::parse("015293170819BQR02651", YEAR).is_some());
        assert!(IdentifierParser::parse("015299170819BQR02651", YEAR).is_some());

        let result = IdentifierParser::validate("015292170819BQR02651", YEAR);
        assert!(result.reason.unwrap().contains("year out of range"));
        let err = IdentifierParser::parse_strict("015298170819BQR02651", 2574).unwrap_err();
        assert_eq!(
            err,
            IdentifierError::YearOutOfRange { year: 2568, min: 2569, max: 2575 }
        );
        assert!(IdentifierParser::parse("015298170819BQR02651", 2567).is_some());
        assert!(IdentifierParser::parse("015298170819BQR02651", 2566).is_none());
    }

    #[test]
    fn parse_and_validate_agree() {
        for id in [
            "015298170819BQR02651",
            "015398170819BQR02651",
            "015298250819BQR02651",
            "015280170819BQR02651",
            "0152981708198QR802651",
            "",
        ] {
            let parsed = IdentifierParser::parse(id, YEAR);
            let validation = IdentifierParser::validate(id, YEAR);
            assert_eq!(parsed.is_some(), validation.valid, "{}", id);
            assert_eq!(parsed, validation.parsed);
        }
    }
}
