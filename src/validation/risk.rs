use crate::models::{ParsedIdentifier, Recommendation, RiskAssessment, RiskLevel};
use crate::validation::format::IdentifierParser;
use log::debug;

/// References older than this many years are flagged as stale.
const STALE_YEAR_SPAN: i32 = 2;
/// Years past the reference year still considered plausible.
const FUTURE_YEAR_SPAN: i32 = 1;
/// Reason count that forces HIGH regardless of individual levels.
const HIGH_RISK_REASON_COUNT: usize = 3;

/// Heuristic authenticity checks on a well-formed reference.
pub struct RiskScorer;

impl RiskScorer {
    /// Parse `id` and assess it. An unparseable reference is HIGH risk.
    pub fn assess(id: &str, current_year: i32) -> RiskAssessment {
        match IdentifierParser::parse_strict(id, current_year) {
            Ok(parsed) => Self::assess_parsed(&parsed, current_year),
            Err(err) => Self::finish(RiskLevel::High, vec![format!("invalid format: {}", err)]),
        }
    }

    pub fn assess_parsed(parsed: &ParsedIdentifier, current_year: i32) -> RiskAssessment {
        let mut level = RiskLevel::Low;
        let mut reasons = Vec::new();

        // Levels only ever rise within one assessment
        let mut flag = |raise_to: RiskLevel, reason: String| {
            level = level.max(raise_to);
            reasons.push(reason);
        };

        if !parsed.is_known_type {
            flag(
                RiskLevel::Medium,
                format!("unknown transaction type code {}", parsed.type_code),
            );
        }

        if Self::is_repetitive(&parsed.sequence) {
            flag(
                RiskLevel::Medium,
                format!("repetitive sequence number {}", parsed.sequence),
            );
        }

        if parsed.year < current_year - STALE_YEAR_SPAN {
            flag(
                RiskLevel::Medium,
                format!(
                    "stale year {}: more than {} years before {}",
                    parsed.year, STALE_YEAR_SPAN, current_year
                ),
            );
        }

        if parsed.year > current_year + FUTURE_YEAR_SPAN {
            flag(
                RiskLevel::High,
                format!("future-dated year {} (current {})", parsed.year, current_year),
            );
        }

        if parsed.is_midnight() {
            flag(
                RiskLevel::Medium,
                "suspicious timestamp 00:00:00".to_string(),
            );
        }

        if reasons.len() >= HIGH_RISK_REASON_COUNT {
            level = RiskLevel::High;
        }

        debug!("risk for {}: {} {:?}", parsed.raw, level, reasons);
        Self::finish(level, reasons)
    }

    fn finish(risk_level: RiskLevel, reasons: Vec<String>) -> RiskAssessment {
        RiskAssessment {
            risk_level,
            reasons,
            recommendation: Recommendation::from(risk_level),
        }
    }

    /// Every digit the same, e.g. `1111`.
    fn is_repetitive(sequence: &str) -> bool {
        let mut digits = sequence.chars();
        match digits.next() {
            Some(first) => digits.all(|c| c == first),
            None => false,
        }
    }
}
