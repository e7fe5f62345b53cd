use crate::models::rules::{MAX_IDENTIFIER_LENGTH, MIN_IDENTIFIER_LENGTH};
use crate::processing::normalizer::{normalize, strip_to_alphanumeric};
use crate::processing::repair::repair;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

/// One way of locating a reference in page text.
pub struct ExtractionStrategy {
    pub name: &'static str,
    pub pattern: Regex,
}

impl ExtractionStrategy {
    fn new(name: &'static str, pattern: &str) -> Self {
        ExtractionStrategy {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

lazy_static! {
    /// Strictest first. Every pattern requires the literal issuer prefix;
    /// without it nothing is extracted. Group 1 is the candidate. The digit
    /// sequence must be followed by a non-digit or the end of text, so a long
    /// sequence is never cut short; OCR often glues the next word straight
    /// onto the reference, so a letter is a valid terminator there.
    pub static ref EXTRACTION_STRATEGIES: Vec<ExtractionStrategy> = vec![
        // prefix + date/time digits + letters + sequence
        ExtractionStrategy::new("strict", r"(0152[0-9]{8}[A-Z]{2,4}[0-9]{3,5})(?:[^0-9]|$)"),
        // grammar shaped, type code may hold digits
        ExtractionStrategy::new("grammar", r"(0152[0-9]{8}[A-Z0-9]{4}[0-9]{3,5})(?:[^0-9]|$)"),
        // right length, any alphanumerics
        ExtractionStrategy::new("alphanumeric", r"(0152[0-9A-Z]{16,17})(?:[^0-9A-Z]|$)"),
        // split by spaces or punctuation
        ExtractionStrategy::new("separated", r"(0152(?:[\s\-./]*[0-9A-Z]){16,17})(?:[^0-9A-Z]|$)"),
        // severe misreads, letters lost entirely
        ExtractionStrategy::new("digits_only", r"(0152[0-9]{12,18})(?:[^0-9]|$)"),
    ];
}

/// A possible reference found in page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierCandidate {
    pub value: String,
    pub score: i32,
    pub strategy: &'static str,
}

/// Confidence from distance to the canonical 20-21 character range.
pub fn length_score(length: usize) -> i32 {
    let distance = if length < MIN_IDENTIFIER_LENGTH {
        MIN_IDENTIFIER_LENGTH - length
    } else if length > MAX_IDENTIFIER_LENGTH {
        length - MAX_IDENTIFIER_LENGTH
    } else {
        0
    };
    100 - 15 * distance as i32
}

/// Every candidate each strategy finds, in strategy order.
pub fn extract_candidates(raw_text: &str) -> Vec<IdentifierCandidate> {
    let text = normalize(raw_text).to_uppercase();
    let mut candidates = Vec::new();

    for strategy in EXTRACTION_STRATEGIES.iter() {
        for found in strategy.pattern.captures_iter(&text).filter_map(|caps| caps.get(1)) {
            let cleaned = normalize(&strip_to_alphanumeric(found.as_str()));
            let value = repair(&cleaned);
            let score = length_score(value.len());
            debug!("candidate {} via {} scored {}", value, strategy.name, score);
            if score > 0 {
                candidates.push(IdentifierCandidate {
                    value,
                    score,
                    strategy: strategy.name,
                });
            }
        }
    }

    candidates
}

/// Best-scoring reference in `raw_text`, or `None` when the issuer prefix
/// never appears. Ties go to the earlier, stricter strategy.
pub fn extract_identifier(raw_text: &str) -> Option<String> {
    let best = extract_candidates(raw_text)
        .into_iter()
        .fold(None::<IdentifierCandidate>, |best, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        });

    best.map(|candidate| candidate.value)
}
