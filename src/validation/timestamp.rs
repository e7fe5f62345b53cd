use crate::models::{DateTimeCheck, ParsedIdentifier, SlipTime};
use crate::processing::normalizer::normalize_numerals;
use crate::validation::format::IdentifierParser;
use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_TIME_TOLERANCE_MINUTES: u32 = 2;

lazy_static! {
    // Colon-separated times first: with dots, a date like 16.09 reads as a time
    static ref TIME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"([0-2]?[0-9])\s*:\s*([0-5][0-9])(?:\s*:\s*([0-5][0-9]))?").unwrap(),
        Regex::new(r"([0-2]?[0-9])\s*\.\s*([0-5][0-9])(?:\s*\.\s*([0-5][0-9]))?").unwrap(),
    ];
}

/// Compares the time embedded in a reference with a time printed elsewhere
/// on the slip.
///
/// Hours must agree exactly. Minutes may drift by up to the tolerance; the
/// drift is measured between full clock times, with a missing printed second
/// taken as zero, and rounded down to whole minutes. Years are never
/// compared: for some transaction families the year code carries a batch
/// number rather than a calendar year.
#[derive(Debug, Clone, Copy)]
pub struct TimestampVerifier {
    tolerance_minutes: u32,
}

impl Default for TimestampVerifier {
    fn default() -> Self {
        TimestampVerifier::new(DEFAULT_TIME_TOLERANCE_MINUTES)
    }
}

impl TimestampVerifier {
    pub fn new(tolerance_minutes: u32) -> Self {
        TimestampVerifier { tolerance_minutes }
    }

    pub fn tolerance_minutes(&self) -> u32 {
        self.tolerance_minutes
    }

    pub fn verify_date_time(&self, id: &str, secondary_text: &str, current_year: i32) -> DateTimeCheck {
        match IdentifierParser::parse_strict(id, current_year) {
            Ok(parsed) => self.verify_parsed(&parsed, secondary_text),
            Err(err) => DateTimeCheck {
                time_match: false,
                identifier_time: None,
                extracted_time: None,
                minute_difference: None,
                message: format!("cannot verify time, reference is invalid: {}", err),
            },
        }
    }

    pub fn verify_parsed(&self, parsed: &ParsedIdentifier, secondary_text: &str) -> DateTimeCheck {
        let identifier_time = parsed.time();

        let extracted = match Self::find_time(secondary_text) {
            Some(time) => time,
            None => {
                return DateTimeCheck {
                    time_match: false,
                    identifier_time: Some(identifier_time),
                    extracted_time: None,
                    minute_difference: None,
                    message: format!("no time found in {:?}", secondary_text),
                }
            }
        };
        let extracted_time = format!("{:02}:{:02}", extracted.hour, extracted.minute);

        let identifier_seconds = parsed.hour * 3600 + parsed.minute * 60 + parsed.second;
        let extracted_seconds =
            extracted.hour * 3600 + extracted.minute * 60 + extracted.second.unwrap_or(0);
        let minute_difference = identifier_seconds.abs_diff(extracted_seconds) / 60;

        let (time_match, message) = if parsed.hour != extracted.hour {
            (
                false,
                format!("hour mismatch: reference {}, slip {}", identifier_time, extracted_time),
            )
        } else if minute_difference > self.tolerance_minutes {
            (
                false,
                format!(
                    "time differs by {} minutes, tolerance is {}",
                    minute_difference, self.tolerance_minutes
                ),
            )
        } else {
            (
                true,
                format!("time matches within {} minute(s)", minute_difference),
            )
        };

        DateTimeCheck {
            time_match,
            identifier_time: Some(identifier_time),
            extracted_time: Some(extracted_time),
            minute_difference: Some(minute_difference),
            message,
        }
    }

    /// First plausible clock time in `text`, after digit normalization.
    pub fn find_time(text: &str) -> Option<SlipTime> {
        let text = normalize_numerals(text);
        TIME_PATTERNS.iter().find_map(|pattern| {
            pattern.captures_iter(&text).find_map(|caps| {
                let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
                let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
                let second = caps.get(3).and_then(|m| m.as_str().parse().ok());
                (hour <= 23).then_some(SlipTime { hour, minute, second })
            })
        })
    }
}
