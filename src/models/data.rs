use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully decoded transaction reference.
///
/// Only produced by the grammar parser, so every instance satisfies the full
/// reference grammar and its semantic bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIdentifier {
    pub raw: String,
    pub year_code: String,
    pub year: i32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub type_code: String,
    pub type_description: String,
    pub is_known_type: bool,
    pub sequence: String,
    pub length: usize,
}

impl ParsedIdentifier {
    /// Embedded time as `HH:MM:SS`.
    pub fn time(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }

    pub fn is_midnight(&self) -> bool {
        self.hour == 0 && self.minute == 0 && self.second == 0
    }
}

/// Outcome of `IdentifierParser::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierValidation {
    pub valid: bool,
    pub reason: Option<String>,
    pub parsed: Option<ParsedIdentifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Accept,
    ManualReview,
    Reject,
}

impl From<RiskLevel> for Recommendation {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Recommendation::Accept,
            RiskLevel::Medium => Recommendation::ManualReview,
            RiskLevel::High => Recommendation::Reject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub recommendation: Recommendation,
}

/// Result of comparing the reference's embedded time with a second,
/// independently read timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeCheck {
    pub time_match: bool,
    pub identifier_time: Option<String>,
    pub extracted_time: Option<String>,
    pub minute_difference: Option<u32>,
    pub message: String,
}

/// Hour and minute (and second, when printed) read off the slip body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipTime {
    pub hour: u32,
    pub minute: u32,
    #[serde(default)]
    pub second: Option<u32>,
}

/// One OCR line with the engine's confidence (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    pub confidence: f32,
}

/// Everything the external OCR layer hands over for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrDocument {
    pub text: String,
    #[serde(default)]
    pub lines: Vec<OcrLine>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Fields pulled out of one slip, ready for the orchestrator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub date_time_text: Option<String>,
    #[serde(default)]
    pub time: Option<SlipTime>,
    #[serde(default)]
    pub ocr_confidence: f32,
}

/// Values the caller expects the slip to carry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedValues {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub recipient_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub issue_type: ValidationIssueType,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(issue_type: ValidationIssueType, message: impl Into<String>) -> Self {
        ValidationIssue {
            issue_type,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssueType {
    Extraction,
    Format,
    Semantic,
    Risk,
    Time,
    Amount,
    Recipient,
    Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountCheck {
    pub extracted: Option<f64>,
    pub expected: Option<f64>,
    pub matches: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientCheck {
    pub extracted: Option<String>,
    pub expected: String,
    pub matches: bool,
}

/// Aggregate verdict for one slip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlipValidation {
    pub is_valid: bool,
    pub identifier: Option<ParsedIdentifier>,
    pub risk: Option<RiskAssessment>,
    pub time_check: Option<DateTimeCheck>,
    pub amount_check: Option<AmountCheck>,
    pub recipient_check: Option<RecipientCheck>,
    pub score: u32,
    pub max_score: u32,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl SlipValidation {
    pub fn score_ratio(&self) -> f64 {
        if self.max_score == 0 {
            0.0
        } else {
            self.score as f64 / self.max_score as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::Low.max(RiskLevel::High), RiskLevel::High);
    }

    #[test]
    fn recommendation_follows_level() {
        assert_eq!(Recommendation::from(RiskLevel::Low), Recommendation::Accept);
        assert_eq!(Recommendation::from(RiskLevel::Medium), Recommendation::ManualReview);
        assert_eq!(Recommendation::from(RiskLevel::High), Recommendation::Reject);
    }

    #[test]
    fn parsed_identifier_serializes_camel_case() {
        let parsed = ParsedIdentifier {
            raw: "015298170819BQR02651".to_string(),
            year_code: "98".to_string(),
            year: 2568,
            hour: 17,
            minute: 8,
            second: 19,
            type_code: "BQR0".to_string(),
            type_description: "Bill QR Payment".to_string(),
            is_known_type: true,
            sequence: "2651".to_string(),
            length: 20,
        };
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["yearCode"], "98");
        assert_eq!(json["isKnownType"], true);
        assert_eq!(parsed.time(), "17:08:19");
        assert!(!parsed.is_midnight());
    }

    #[test]
    fn ocr_document_lines_default_to_empty() {
        let doc: OcrDocument = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert!(doc.lines.is_empty());
        assert!(doc.confidence.is_none());
    }
}
