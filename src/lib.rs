pub mod models;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod slip_validator;

pub use models::{
    DateTimeCheck, ExpectedValues, ExtractedFields, IdentifierValidation, OcrDocument,
    ParsedIdentifier, RiskAssessment, RiskLevel, ScoringPolicy, SlipValidation,
};
pub use processing::{extract_identifier, SlipFieldExtractor};
pub use slip_validator::SlipValidator;
pub use utils::{Calendar, FixedCalendar, IdentifierError, SlipError, SystemCalendar};
pub use validation::{IdentifierParser, RiskScorer, TimestampVerifier};

/// Decode a transaction reference against the given Buddhist-calendar year.
pub fn parse(id: &str, current_year: i32) -> Option<ParsedIdentifier> {
    IdentifierParser::parse(id, current_year)
}

pub fn validate(id: &str, current_year: i32) -> IdentifierValidation {
    IdentifierParser::validate(id, current_year)
}

pub fn assess(id: &str, current_year: i32) -> RiskAssessment {
    RiskScorer::assess(id, current_year)
}

/// Cross-check with the default two minute tolerance.
pub fn verify_date_time(id: &str, secondary_text: &str, current_year: i32) -> DateTimeCheck {
    TimestampVerifier::default().verify_date_time(id, secondary_text, current_year)
}

/// Validate with the default policy against the wall-clock year.
pub fn validate_slip(fields: &ExtractedFields, expected: &ExpectedValues) -> SlipValidation {
    SlipValidator::new(ScoringPolicy::default(), SystemCalendar).validate_slip(fields, expected)
}
